//! Session events
//!
//! The controller reports progress through a [`SessionHandler`] injected at
//! construction. Handlers run synchronously inside the controller call that
//! triggered them:
//! - `on_trial_changed` when a new stimulus starts
//! - `on_session_finished` exactly once, after the right ear is exhausted
//!
//! [`ChannelHandler`] forwards both as serialisable [`SessionEvent`]s for
//! consumers living on another task (UI, logging).

use hearing_core::{Ear, Trial};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Snapshot of the running session, taken when a stimulus starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialProgress {
    /// Ear being tested
    pub ear: Ear,

    /// Frequency being presented
    pub frequency_hz: u32,

    /// Index into the frequency list for the current ear
    pub index: usize,

    /// Length of the frequency list (steps per ear)
    pub total: usize,

    /// Gain commanded for this presentation
    pub gain: f64,

    /// True when this presentation repeats the frequency (adaptive mode)
    pub repeat: bool,
}

impl TrialProgress {
    /// Completed-plus-current step over both ears, 1-based
    pub fn overall_step(&self) -> usize {
        let ear_offset = match self.ear {
            Ear::Left => 0,
            Ear::Right => self.total,
        };
        ear_offset + self.index + 1
    }

    /// Steps over both ears
    pub fn overall_total(&self) -> usize {
        self.total * 2
    }

    /// Progress through the whole session in [0, 1]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.overall_step() as f64 / self.overall_total() as f64
    }
}

/// Events emitted by the trial controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A new stimulus started
    TrialChanged(TrialProgress),

    /// All frequencies were tested on both ears
    SessionFinished {
        /// Final trials (one per frequency/ear pair)
        final_trials: usize,
        /// All recorded trials, interim ones included
        total_trials: usize,
    },
}

/// Receiver of controller notifications
pub trait SessionHandler: Send {
    /// A new stimulus started; `progress` describes it
    fn on_trial_changed(&mut self, progress: &TrialProgress);

    /// The session finished; `trials` is the complete, final trial list
    fn on_session_finished(&mut self, trials: &[Trial]);
}

/// Handler that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl SessionHandler for NoopHandler {
    fn on_trial_changed(&mut self, _progress: &TrialProgress) {}

    fn on_session_finished(&mut self, _trials: &[Trial]) {}
}

/// Forwards notifications as [`SessionEvent`]s over an unbounded channel
///
/// A dropped receiver is not an error; events are discarded.
#[derive(Debug, Clone)]
pub struct ChannelHandler {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl ChannelHandler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SessionHandler for ChannelHandler {
    fn on_trial_changed(&mut self, progress: &TrialProgress) {
        let _ = self.tx.send(SessionEvent::TrialChanged(*progress));
    }

    fn on_session_finished(&mut self, trials: &[Trial]) {
        let _ = self.tx.send(SessionEvent::SessionFinished {
            final_trials: trials.iter().filter(|t| t.is_final).count(),
            total_trials: trials.len(),
        });
    }
}
