//! Log-frequency threshold interpolation
//!
//! Audiometric grids are octave-spaced, so measured thresholds are
//! interpolated linearly in `ln(frequency)`. Targets outside the measured
//! range hold the nearest endpoint level.

use serde::{Deserialize, Serialize};

/// A level measured (or estimated) at one frequency
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasuredPoint {
    pub frequency_hz: u32,
    pub level_db: f64,
}

impl MeasuredPoint {
    pub fn new(frequency_hz: u32, level_db: f64) -> Self {
        Self {
            frequency_hz,
            level_db,
        }
    }
}

/// Estimate levels at `targets` from sparse `measured` points
///
/// Returns one point per target, in target order. An empty `measured` slice
/// yields an empty result (no data, not zero). Duplicate measured
/// frequencies resolve to their first occurrence.
pub fn interpolate(measured: &[MeasuredPoint], targets: &[u32]) -> Vec<MeasuredPoint> {
    if measured.is_empty() {
        return Vec::new();
    }

    let mut sorted = measured.to_vec();
    // stable: equal frequencies keep input order
    sorted.sort_by_key(|p| p.frequency_hz);
    sorted.dedup_by_key(|p| p.frequency_hz);

    targets
        .iter()
        .map(|&frequency_hz| MeasuredPoint {
            frequency_hz,
            level_db: level_at(&sorted, frequency_hz),
        })
        .collect()
}

/// `points` is non-empty, ascending and free of duplicate frequencies
fn level_at(points: &[MeasuredPoint], frequency_hz: u32) -> f64 {
    let first = points[0];
    let last = points[points.len() - 1];

    if frequency_hz <= first.frequency_hz {
        return first.level_db;
    }
    if frequency_hz >= last.frequency_hz {
        return last.level_db;
    }

    // first index with frequency >= target; 1..len by the checks above
    let upper = points.partition_point(|p| p.frequency_hz < frequency_hz);
    let b = points[upper];
    if b.frequency_hz == frequency_hz {
        return b.level_db;
    }
    let a = points[upper - 1];

    let log_f = f64::from(frequency_hz).ln();
    let log_a = f64::from(a.frequency_hz).ln();
    let log_b = f64::from(b.frequency_hz).ln();
    let t = (log_f - log_a) / (log_b - log_a);

    a.level_db + t * (b.level_db - a.level_db)
}
