//! Core types shared by the procedure and the session layer

use crate::level::Level;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ear receiving the stimulus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ear {
    Left,
    Right,
}

impl Ear {
    /// Both ears in presentation order
    pub const ORDER: [Ear; 2] = [Ear::Left, Ear::Right];
}

impl fmt::Display for Ear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ear::Left => f.write_str("left"),
            Ear::Right => f.write_str("right"),
        }
    }
}

/// One recorded stimulus presentation
///
/// Final trials close a frequency/ear pair; interim trials are the
/// intermediate presentations of an adaptive staircase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Stimulus frequency
    pub frequency_hz: u32,

    /// Ear the stimulus was routed to
    pub ear: Ear,

    /// Recorded level, `None` when the tone was not heard
    ///
    /// For final adaptive trials this is the staircase threshold estimate.
    pub level: Option<Level>,

    /// Whether the subject responded before the deadline
    pub heard: bool,

    /// Whether this trial closes its frequency/ear pair
    pub is_final: bool,
}

impl Trial {
    /// Recorded level in dB
    pub fn level_db(&self) -> Option<f64> {
        self.level.map(|l| l.db())
    }
}
