//! Gain / decibel conversions
//!
//! Stimulus loudness is commanded as a linear amplitude gain in [0, 1] and
//! reasoned about in dB re full scale. `0 dB` is unity gain.

use serde::{Deserialize, Serialize};

/// Convert linear gain to dB: `20 * log10(gain)`
///
/// A gain of zero maps to negative infinity; use [`Level::from_gain`] when the
/// result must stay inside a bounded range.
#[inline]
pub fn gain_to_db(gain: f64) -> f64 {
    20.0 * gain.log10()
}

/// Convert dB to linear gain: `10^(db / 20)`
#[inline]
pub fn db_to_gain(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Clamp a gain to the [0, 1] range a device can reproduce
#[inline]
pub fn clamp01(gain: f64) -> f64 {
    gain.clamp(0.0, 1.0)
}

/// Closed dB interval `[min_db, max_db]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DbRange {
    pub min_db: f64,
    pub max_db: f64,
}

impl DbRange {
    pub const fn new(min_db: f64, max_db: f64) -> Self {
        Self { min_db, max_db }
    }

    /// Clamp a dB value into the range
    ///
    /// NaN (e.g. from `log10` of a negative gain) collapses to `min_db`.
    pub fn clamp(&self, db: f64) -> f64 {
        if db.is_nan() {
            return self.min_db;
        }
        db.max(self.min_db).min(self.max_db)
    }
}

impl Default for DbRange {
    fn default() -> Self {
        Self::new(-90.0, 0.0)
    }
}

/// A stimulus level, stored in dB and viewable as linear gain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level {
    db: f64,
}

impl Level {
    /// Level from a dB value, clamped into `range`
    pub fn from_db(db: f64, range: DbRange) -> Self {
        Self {
            db: range.clamp(db),
        }
    }

    /// Level from a linear gain, clamped into `range`
    ///
    /// Silence (gain <= 0) becomes `range.min_db`.
    pub fn from_gain(gain: f64, range: DbRange) -> Self {
        if gain <= 0.0 {
            return Self { db: range.min_db };
        }
        Self::from_db(gain_to_db(gain), range)
    }

    pub fn db(&self) -> f64 {
        self.db
    }

    /// Linear gain, clamped to [0, 1]
    pub fn gain(&self) -> f64 {
        clamp01(db_to_gain(self.db))
    }
}
