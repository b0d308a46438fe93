//! Test frequency lists

use crate::error::{HearingError, Result};

/// Standard compact audiometric set
pub const DEFAULT_TEST_FREQUENCIES: &[u32] = &[250, 500, 1000, 2000, 4000, 8000];

/// Finer set, still short enough for a single sitting
pub const EXTENDED_TEST_FREQUENCIES: &[u32] = &[
    150, 250, 315, 500, 630, 1000, 1250, 2000, 2500, 4000, 5000, 8000, 12000, 13000,
];

/// Generate `count` log-geometrically spaced frequencies from `start_hz` to `end_hz`
///
/// Values are rounded to whole Hz; entries that collapse onto the same integer
/// are dropped, so the result can be shorter than `count`.
pub fn log_spaced(start_hz: u32, end_hz: u32, count: usize) -> Result<Vec<u32>> {
    if start_hz == 0 || end_hz == 0 {
        return Err(HearingError::InvalidFrequencies(
            "frequency bounds must be positive".to_string(),
        ));
    }
    if start_hz > end_hz {
        return Err(HearingError::InvalidFrequencies(format!(
            "start {start_hz} Hz is above end {end_hz} Hz"
        )));
    }

    match count {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![start_hz]),
        _ => {}
    }

    let log_start = f64::from(start_hz).ln();
    let log_end = f64::from(end_hz).ln();
    let mut frequencies: Vec<u32> = (0..count)
        .map(|i| {
            let t = i as f64 / (count - 1) as f64;
            (log_start + t * (log_end - log_start)).exp().round() as u32
        })
        .collect();
    frequencies.dedup();

    Ok(frequencies)
}

/// Reject lists containing a frequency that cannot be presented
///
/// An empty list is valid.
pub fn validate(frequencies: &[u32]) -> Result<()> {
    if let Some(position) = frequencies.iter().position(|&f| f == 0) {
        return Err(HearingError::InvalidFrequencies(format!(
            "entry {position} is 0 Hz"
        )));
    }
    Ok(())
}
