//! Session reporting
//!
//! Turns the final trials of a session into per-ear hearing levels (dB HL),
//! a severity class and an audiogram interpolated onto a target grid.

use crate::error::Result;
use hearing_core::{
    classify_severity, hearing_level, interpolate, Ear, MeasuredPoint, Severity, Trial,
};
use serde::{Deserialize, Serialize};

/// Results for one ear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarReport {
    pub ear: Ear,

    /// Measured hearing levels (dB HL), in presentation order
    pub hearing_levels: Vec<MeasuredPoint>,

    /// Frequencies whose final trial carried no level (never heard)
    pub unheard_frequencies: Vec<u32>,

    /// Mean of `hearing_levels`, `None` without data
    pub average_hl: Option<f64>,

    /// Classification of `average_hl`
    pub severity: Option<Severity>,

    /// `hearing_levels` interpolated onto the report's target frequencies
    pub audiogram: Vec<MeasuredPoint>,
}

impl EarReport {
    fn build(ear: Ear, trials: &[Trial], targets: &[u32], clamp: bool) -> Result<Self> {
        let mut hearing_levels = Vec::new();
        let mut unheard_frequencies = Vec::new();

        for trial in trials.iter().filter(|t| t.is_final && t.ear == ear) {
            match trial.level_db() {
                Some(threshold_db) => {
                    let hl = hearing_level(threshold_db, trial.frequency_hz, clamp)?;
                    hearing_levels.push(MeasuredPoint::new(trial.frequency_hz, hl));
                }
                None => unheard_frequencies.push(trial.frequency_hz),
            }
        }

        let average_hl = if hearing_levels.is_empty() {
            None
        } else {
            let sum: f64 = hearing_levels.iter().map(|p| p.level_db).sum();
            Some(sum / hearing_levels.len() as f64)
        };

        Ok(Self {
            ear,
            audiogram: interpolate(&hearing_levels, targets),
            severity: average_hl.map(classify_severity),
            hearing_levels,
            unheard_frequencies,
            average_hl,
        })
    }
}

/// Report over both ears
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub left: EarReport,
    pub right: EarReport,
}

impl SessionReport {
    /// Build a report from recorded trials
    ///
    /// Interim trials are skipped. Fails with `MissingReference` when a final
    /// trial's frequency has no normal-hearing reference. Hearing levels are
    /// clamped to the -20..60 dB HL chart range.
    pub fn from_trials(trials: &[Trial], targets: &[u32]) -> Result<Self> {
        Ok(Self {
            left: EarReport::build(Ear::Left, trials, targets, true)?,
            right: EarReport::build(Ear::Right, trials, targets, true)?,
        })
    }

    pub fn ear(&self, ear: Ear) -> &EarReport {
        match ear {
            Ear::Left => &self.left,
            Ear::Right => &self.right,
        }
    }

    /// Serialise the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
