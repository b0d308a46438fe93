//! Normal-hearing reference thresholds and dB HL conversion
//!
//! Reference values are the thresholds expected from known-good hearing on
//! the calibrated slow-ramp profile (ramp 5 s, ramp power 10, max gain 0.7).
//! They must be re-measured when the playback chain changes.

use crate::error::{HearingError, Result};

/// Lowest hearing level reported when clamping
pub const MIN_HEARING_LEVEL: f64 = -20.0;
/// Highest hearing level reported when clamping
pub const MAX_HEARING_LEVEL: f64 = 60.0;

/// Full-scale span of the chart axis, in dB HL
pub const CHART_SPAN_DB: f64 = 60.0;

/// `(frequency Hz, reference threshold dB)`, ascending
pub const NORMAL_THRESHOLD_DB: &[(u32, f64)] = &[
    (125, -30.0),
    (250, -30.0),
    (500, -34.0),
    (1000, -34.0),
    (2000, -34.0),
    (4000, -33.0),
    (8000, -31.0),
];

/// Reference threshold for `frequency_hz`
pub fn reference_threshold(frequency_hz: u32) -> Result<f64> {
    NORMAL_THRESHOLD_DB
        .iter()
        .find(|(f, _)| *f == frequency_hz)
        .map(|(_, db)| *db)
        .ok_or(HearingError::MissingReference(frequency_hz))
}

/// Convert a measured threshold to hearing level relative to the reference
///
/// Positive values are worse than the reference, negative better. The result
/// is rounded to whole dB and, with `clamp`, limited to
/// [`MIN_HEARING_LEVEL`]..=[`MAX_HEARING_LEVEL`].
pub fn hearing_level(threshold_db: f64, frequency_hz: u32, clamp: bool) -> Result<f64> {
    let reference = reference_threshold(frequency_hz)?;
    let mut hl = threshold_db - reference;
    if clamp {
        hl = hl.clamp(MIN_HEARING_LEVEL, MAX_HEARING_LEVEL);
    }
    Ok(hl.round())
}

/// Map a response gain onto the 0..60 dB chart axis
///
/// `max_gain` is the loudest gain the test presents; it maps to the top of
/// the axis.
pub fn chart_level(gain: f64, max_gain: f64) -> f64 {
    if max_gain <= 0.0 {
        return 0.0;
    }
    ((gain / max_gain) * CHART_SPAN_DB).clamp(0.0, CHART_SPAN_DB)
}
