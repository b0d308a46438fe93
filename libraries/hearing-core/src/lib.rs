//! Hearing Test - Core Procedure
//!
//! Platform-agnostic building blocks of the hearing-threshold test.
//!
//! This crate provides:
//! - Gain / dB conversions with bounded levels
//! - A transformed up-down adaptive staircase (2-down/1-up by default)
//! - Log-frequency threshold interpolation
//! - Hearing-level (dB HL) conversion against a normal-hearing reference
//! - Coarse severity classification
//! - Test frequency presets and log-spaced generation
//!
//! Nothing here knows about audio devices, timers or ears being switched;
//! that orchestration lives in `hearing-session`.
//!
//! # Example: Staircase
//!
//! ```rust
//! use hearing_core::{AdaptiveStaircase, StaircaseConfig};
//!
//! let mut staircase = AdaptiveStaircase::new(StaircaseConfig::default()).unwrap();
//!
//! // two hits in a row lower the level by one step
//! staircase.record_response(true);
//! let step = staircase.record_response(true);
//! assert_eq!(staircase.current_level_db(), -26.0);
//! assert!(!step.finished);
//! ```
//!
//! # Example: Interpolation
//!
//! ```rust
//! use hearing_core::{interpolate, classify_severity, MeasuredPoint, Severity};
//!
//! let measured = [MeasuredPoint::new(1000, 10.0), MeasuredPoint::new(4000, 30.0)];
//! let audiogram = interpolate(&measured, &[500, 2000, 8000]);
//!
//! assert_eq!(audiogram[0].level_db, 10.0); // plateau below the range
//! assert!((audiogram[1].level_db - 20.0).abs() < 1e-9);
//! assert_eq!(classify_severity(audiogram[2].level_db), Severity::Mild);
//! ```

#![forbid(unsafe_code)]

mod error;
pub mod frequencies;
mod interpolation;
mod level;
pub mod reference;
mod severity;
mod staircase;
pub mod types;

pub use error::{HearingError, Result};
pub use frequencies::{DEFAULT_TEST_FREQUENCIES, EXTENDED_TEST_FREQUENCIES};
pub use interpolation::{interpolate, MeasuredPoint};
pub use level::{clamp01, db_to_gain, gain_to_db, DbRange, Level};
pub use reference::{chart_level, hearing_level, reference_threshold};
pub use severity::{classify_severity, Severity};
pub use staircase::{
    AdaptiveStaircase, StaircaseConfig, StaircaseStep, StepDirection, ESTIMATE_REVERSALS,
};
pub use types::{Ear, Trial};
