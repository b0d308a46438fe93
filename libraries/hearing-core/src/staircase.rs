//! Transformed up-down staircase
//!
//! Moves the stimulus level toward the edge of audibility: `down` consecutive
//! hits lower the level by one step, `up` consecutive misses raise it (the
//! classic 2-down/1-up rule by default). Every change of step direction is a
//! reversal; the procedure converges after `stop_reversals` of them and the
//! threshold estimate is the mean of the most recent reversal levels.

use crate::error::{HearingError, Result};
use crate::level::{clamp01, db_to_gain, DbRange};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of trailing reversals averaged into the threshold estimate
pub const ESTIMATE_REVERSALS: usize = 4;

/// Staircase parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaircaseConfig {
    /// Starting level in dB (default: -20)
    pub start_db: f64,

    /// Step size in dB (default: 6)
    pub step_db: f64,

    /// Consecutive hits required for a down step (default: 2)
    pub down: u32,

    /// Consecutive misses required for an up step (default: 1)
    pub up: u32,

    /// Lowest reachable level in dB (default: -90)
    pub min_db: f64,

    /// Highest reachable level in dB (default: 0)
    pub max_db: f64,

    /// Reversals after which the staircase reports convergence (default: 6)
    pub stop_reversals: usize,
}

impl Default for StaircaseConfig {
    fn default() -> Self {
        Self {
            start_db: -20.0,
            step_db: 6.0,
            down: 2,
            up: 1,
            min_db: -90.0,
            max_db: 0.0,
            stop_reversals: 6,
        }
    }
}

impl StaircaseConfig {
    /// Check bounds and step parameters
    pub fn validate(&self) -> Result<()> {
        let values = [self.start_db, self.step_db, self.min_db, self.max_db];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(HearingError::InvalidStaircase(
                "levels and step must be finite".to_string(),
            ));
        }
        if self.min_db > self.max_db {
            return Err(HearingError::InvalidStaircase(format!(
                "min_db ({}) is above max_db ({})",
                self.min_db, self.max_db
            )));
        }
        if self.step_db <= 0.0 {
            return Err(HearingError::InvalidStaircase(format!(
                "step_db must be positive, got {}",
                self.step_db
            )));
        }
        if self.down == 0 || self.up == 0 {
            return Err(HearingError::InvalidStaircase(
                "down and up must be at least 1".to_string(),
            ));
        }
        if self.stop_reversals == 0 {
            return Err(HearingError::InvalidStaircase(
                "stop_reversals must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn range(&self) -> DbRange {
        DbRange::new(self.min_db, self.max_db)
    }
}

/// Direction of the last level change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepDirection {
    Up,
    Down,
}

/// Outcome of feeding one response to the staircase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaircaseStep {
    /// Reversal count reached `stop_reversals`
    pub finished: bool,

    /// Level for the next presentation, as clamped linear gain
    pub level: f64,
}

/// N-down/M-up adaptive staircase
#[derive(Debug, Clone)]
pub struct AdaptiveStaircase {
    config: StaircaseConfig,
    current_db: f64,
    consecutive_hits: u32,
    consecutive_misses: u32,
    last_direction: Option<StepDirection>,
    reversals: Vec<f64>,
}

impl AdaptiveStaircase {
    /// Create a staircase, rejecting unusable configurations
    ///
    /// The start level is clamped into `[min_db, max_db]`.
    pub fn new(config: StaircaseConfig) -> Result<Self> {
        config.validate()?;
        let current_db = config.range().clamp(config.start_db);

        Ok(Self {
            config,
            current_db,
            consecutive_hits: 0,
            consecutive_misses: 0,
            last_direction: None,
            reversals: Vec::new(),
        })
    }

    /// Current level as clamped linear gain
    pub fn current_level(&self) -> f64 {
        clamp01(db_to_gain(self.current_db))
    }

    pub fn current_level_db(&self) -> f64 {
        self.current_db
    }

    /// Score one response and move the level if the rule triggers
    pub fn record_response(&mut self, heard: bool) -> StaircaseStep {
        if heard {
            self.consecutive_misses = 0;
            self.consecutive_hits += 1;
            if self.consecutive_hits >= self.config.down {
                self.step(StepDirection::Down);
                self.consecutive_hits = 0;
            }
        } else {
            self.consecutive_hits = 0;
            self.consecutive_misses += 1;
            if self.consecutive_misses >= self.config.up {
                self.step(StepDirection::Up);
                self.consecutive_misses = 0;
            }
        }

        StaircaseStep {
            finished: self.is_finished(),
            level: self.current_level(),
        }
    }

    fn step(&mut self, direction: StepDirection) {
        if let Some(previous) = self.last_direction {
            if previous != direction {
                self.reversals.push(self.current_db);
                debug!(
                    "Staircase reversal #{} at {:.1} dB",
                    self.reversals.len(),
                    self.current_db
                );
            }
        }
        self.last_direction = Some(direction);

        self.current_db = match direction {
            StepDirection::Down => (self.current_db - self.config.step_db).max(self.config.min_db),
            StepDirection::Up => (self.current_db + self.config.step_db).min(self.config.max_db),
        };
    }

    /// Threshold estimate in dB
    ///
    /// Mean of the last [`ESTIMATE_REVERSALS`] reversal levels (all of them if
    /// fewer), or the current level before the first reversal.
    pub fn estimate_db(&self) -> f64 {
        if self.reversals.is_empty() {
            return self.current_db;
        }
        let start = self.reversals.len().saturating_sub(ESTIMATE_REVERSALS);
        let recent = &self.reversals[start..];
        recent.iter().sum::<f64>() / recent.len() as f64
    }

    pub fn is_finished(&self) -> bool {
        self.reversals.len() >= self.config.stop_reversals
    }

    /// Reversal levels in order of occurrence
    pub fn reversals(&self) -> &[f64] {
        &self.reversals
    }

    pub fn reversal_count(&self) -> usize {
        self.reversals.len()
    }

    pub fn last_direction(&self) -> Option<StepDirection> {
        self.last_direction
    }

    pub fn consecutive_hits(&self) -> u32 {
        self.consecutive_hits
    }

    pub fn config(&self) -> &StaircaseConfig {
        &self.config
    }
}
