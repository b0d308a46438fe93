//! Platform-agnostic stimulus device trait
//!
//! Abstracts tone synthesis and channel routing so the controller works with
//! any audio backend (desktop output, browser bridge, test doubles).

use crate::config::RampShape;
use crate::error::Result;
use async_trait::async_trait;
use hearing_core::Ear;

/// Tone generator driven by the trial controller
///
/// Implementors own the audio path. The controller only commands presentations
/// and reads back the gain actually reached.
#[async_trait]
pub trait StimulusDevice: Send {
    /// Bring the audio subsystem up
    ///
    /// Awaited by `TrialController::start` before the first presentation.
    /// Fails with `SessionError::DeviceUnavailable` when the host has no usable
    /// audio output.
    async fn init(&mut self) -> Result<()>;

    /// Start a tone ramping from silence to `gain` on one ear
    ///
    /// Fire-and-forget: returns as soon as the tone is scheduled.
    fn present(&mut self, frequency_hz: u32, gain: f64, ear: Ear, ramp: RampShape);

    /// Stop the current tone
    ///
    /// Must be safe to call when nothing is playing.
    fn stop(&mut self);

    /// Linear gain currently reaching the output
    ///
    /// Differs from the commanded gain while a ramp is in progress.
    fn current_level(&self) -> f64;
}
