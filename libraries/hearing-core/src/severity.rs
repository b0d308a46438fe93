//! Coarse hearing-loss classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound (exclusive) of the normal band, in dB HL
pub const NORMAL_LIMIT_DB: f64 = 20.0;
/// Upper bound (exclusive) of the mild band, in dB HL
pub const MILD_LIMIT_DB: f64 = 40.0;
/// Upper bound (exclusive) of the moderate band, in dB HL
pub const MODERATE_LIMIT_DB: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Normal => "Normal",
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify an average hearing level
///
/// `<20` normal, `<40` mild, `<60` moderate, otherwise severe.
pub fn classify_severity(avg_level_db: f64) -> Severity {
    if avg_level_db < NORMAL_LIMIT_DB {
        Severity::Normal
    } else if avg_level_db < MILD_LIMIT_DB {
        Severity::Mild
    } else if avg_level_db < MODERATE_LIMIT_DB {
        Severity::Moderate
    } else {
        Severity::Severe
    }
}
