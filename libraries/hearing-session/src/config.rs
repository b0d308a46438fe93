//! Session configuration
//!
//! Loaded from an optional TOML file with `HEARING_`-prefixed environment
//! overrides (nested keys use a double underscore, e.g.
//! `HEARING_STAIRCASE__STEP_DB=4`).

use crate::error::{Result, SessionError};
use hearing_core::{frequencies, DbRange, StaircaseConfig, DEFAULT_TEST_FREQUENCIES};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// How each frequency/ear pair is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    /// One ramped presentation at `max_gain` per pair
    #[default]
    Fixed,

    /// Adaptive staircase per pair until it converges
    Staircase,
}

/// Named timing presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestProfile {
    /// Short ramp, 3.5 s response window
    Quick,

    /// Slow ramp the reference thresholds were measured with, 7 s window
    Calibrated,
}

/// Envelope of a presented tone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampShape {
    /// Time from silence to the target gain
    pub duration: Duration,

    /// Curve exponent (1.0 linear, higher values stay quiet longer)
    pub power: f64,
}

/// Configuration for the trial controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Frequencies in presentation order (default: 250 Hz - 8 kHz octaves)
    pub frequencies: Vec<u32>,

    /// Measurement mode (default: fixed)
    pub mode: TestMode,

    /// Gain of fixed-mode presentations (default: 0.7)
    pub max_gain: f64,

    /// Response window per presentation in milliseconds (default: 3500)
    pub step_timeout_ms: u64,

    /// Ramp-in duration in seconds (default: 2.0)
    pub ramp_duration_secs: f64,

    /// Ramp curve exponent (default: 3.0)
    pub ramp_power: f64,

    /// Staircase parameters for adaptive mode
    pub staircase: StaircaseConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_profile(TestProfile::Quick)
    }
}

impl SessionConfig {
    /// Configuration preset for a timing profile
    pub fn for_profile(profile: TestProfile) -> Self {
        let (step_timeout_ms, ramp_duration_secs, ramp_power) = match profile {
            TestProfile::Quick => (3500, 2.0, 3.0),
            TestProfile::Calibrated => (7000, 5.0, 10.0),
        };

        Self {
            frequencies: DEFAULT_TEST_FREQUENCIES.to_vec(),
            mode: TestMode::Fixed,
            max_gain: 0.7,
            step_timeout_ms,
            ramp_duration_secs,
            ramp_power,
            staircase: StaircaseConfig::default(),
        }
    }

    /// Load configuration from `path` (if it exists) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if path.exists() {
                settings = settings.add_source(config::File::from(path));
            } else {
                tracing::warn!("Config file {:?} not found, using defaults", path);
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("HEARING")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("frequencies"),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        frequencies::validate(&self.frequencies)?;
        self.staircase.validate()?;

        if !(self.max_gain > 0.0 && self.max_gain <= 1.0) {
            return Err(SessionError::Config(format!(
                "max_gain must be in (0, 1], got {}",
                self.max_gain
            )));
        }
        if self.step_timeout_ms == 0 {
            return Err(SessionError::Config(
                "step_timeout_ms must be positive".to_string(),
            ));
        }
        if !(self.ramp_duration_secs.is_finite() && self.ramp_duration_secs >= 0.0) {
            return Err(SessionError::Config(format!(
                "ramp_duration_secs must be non-negative, got {}",
                self.ramp_duration_secs
            )));
        }
        if !(self.ramp_power.is_finite() && self.ramp_power > 0.0) {
            return Err(SessionError::Config(format!(
                "ramp_power must be positive, got {}",
                self.ramp_power
            )));
        }

        Ok(())
    }

    pub fn step_timeout(&self) -> Duration {
        Duration::from_millis(self.step_timeout_ms)
    }

    /// Ramp applied to every presentation
    ///
    /// Only meaningful on a validated configuration.
    pub fn ramp(&self) -> RampShape {
        RampShape {
            duration: Duration::from_secs_f64(self.ramp_duration_secs.max(0.0)),
            power: self.ramp_power,
        }
    }

    /// Bounds used when recording levels
    pub fn level_range(&self) -> DbRange {
        self.staircase.range()
    }
}
