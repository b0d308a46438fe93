//! Trial controller - session orchestration
//!
//! Walks the frequency list for the left ear, then the right ear. Every
//! presentation arms a response deadline; a "heard" response or the deadline
//! expiring scores the trial, whichever comes first. In staircase mode a
//! frequency is repeated until its staircase converges.

use crate::{
    config::{SessionConfig, TestMode},
    deadline::{ArmedDeadline, DeadlineTicket, ResponseDeadline},
    device::StimulusDevice,
    error::{Result, SessionError},
    events::{SessionHandler, TrialProgress},
};
use hearing_core::{AdaptiveStaircase, Ear, Level, Trial};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Not started, or the last start failed
    Idle,

    /// Presenting stimuli; exactly one response deadline is armed
    Running,

    /// Both ears exhausted
    Finished,
}

/// Input from the subject, stamped with the trial it answers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectResponse {
    Heard(DeadlineTicket),
}

/// Receiving side of a response channel, consumed by [`TrialController::run`]
pub type ResponseReceiver = mpsc::UnboundedReceiver<SubjectResponse>;

/// Cloneable sending side of the response channel (button, key binding...)
///
/// Created by [`TrialController::response_channel`].
#[derive(Debug, Clone)]
pub struct ResponseSender {
    tx: mpsc::UnboundedSender<SubjectResponse>,
    live: watch::Receiver<Option<DeadlineTicket>>,
}

impl ResponseSender {
    /// Signal that the tone was heard
    ///
    /// The press answers the trial awaiting a response at the moment it is
    /// sent. Returns false, sending nothing, when no trial is awaiting one or
    /// the controller side has been dropped.
    pub fn heard(&self) -> bool {
        let Some(ticket) = *self.live.borrow() else {
            return false;
        };
        self.tx.send(SubjectResponse::Heard(ticket)).is_ok()
    }
}

/// Measurement procedure for one frequency/ear pair
///
/// Built fresh for every pair and replaced, never reset, when the pair closes.
#[derive(Debug, Clone)]
enum PairProcedure {
    Fixed,
    Adaptive(AdaptiveStaircase),
}

impl PairProcedure {
    fn begin(config: &SessionConfig) -> Result<Self> {
        Ok(match config.mode {
            TestMode::Fixed => Self::Fixed,
            TestMode::Staircase => {
                Self::Adaptive(AdaptiveStaircase::new(config.staircase.clone())?)
            }
        })
    }
}

/// What a scored response produced
enum Outcome {
    /// Pair closed with this level
    Final(Option<Level>),
    /// Staircase still running; repeat the frequency
    Interim(Option<Level>),
}

/// Hearing test controller
///
/// Owns all session state. Integrators drive it with [`start`](Self::start)
/// followed by [`run`](Self::run), or call [`heard`](Self::heard) and
/// [`expire`](Self::expire) from their own event loop.
pub struct TrialController<D: StimulusDevice> {
    config: SessionConfig,
    device: D,
    handler: Box<dyn SessionHandler>,

    status: SessionStatus,
    ear: Ear,
    index: usize,
    trials: Vec<Trial>,
    procedure: PairProcedure,
    deadline: ResponseDeadline,
    repeat: bool,
}

impl<D: StimulusDevice> TrialController<D> {
    /// Create an idle controller
    ///
    /// The configuration is validated by [`start`](Self::start).
    pub fn new(config: SessionConfig, device: D, handler: impl SessionHandler + 'static) -> Self {
        Self {
            config,
            device,
            handler: Box::new(handler),
            status: SessionStatus::Idle,
            ear: Ear::ORDER[0],
            index: 0,
            trials: Vec::new(),
            procedure: PairProcedure::Fixed,
            deadline: ResponseDeadline::new(),
            repeat: false,
        }
    }

    /// Create a channel for subject responses
    ///
    /// Presses are tied to the trial live when they are sent; presses made
    /// while nothing awaits a response never reach the controller.
    pub fn response_channel(&self) -> (ResponseSender, ResponseReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = ResponseSender {
            tx,
            live: self.deadline.subscribe(),
        };
        (sender, rx)
    }

    /// Start (or restart) the session and present the first stimulus
    ///
    /// Cancels any pending deadline and stops the current tone first. Waits for
    /// the device to initialise; on failure the session stays idle.
    pub async fn start(&mut self) -> Result<()> {
        if self.deadline.cancel() {
            debug!("Cancelled pending response deadline for restart");
        }
        self.device.stop();
        self.status = SessionStatus::Idle;

        self.config.validate()?;
        let procedure = PairProcedure::begin(&self.config)?;

        if let Err(e) = self.device.init().await {
            warn!("Stimulus device failed to initialise: {}", e);
            return Err(e);
        }

        self.ear = Ear::ORDER[0];
        self.index = 0;
        self.trials.clear();
        self.procedure = procedure;
        self.repeat = false;
        self.status = SessionStatus::Running;

        info!(
            "Starting hearing test: {} frequencies, {:?} mode",
            self.config.frequencies.len(),
            self.config.mode
        );

        self.advance()
    }

    /// Drive the session until it finishes
    ///
    /// Scores a trial for every response received and for every deadline that
    /// expires first. A closed response channel is not an error; the remaining
    /// trials then time out.
    pub async fn run(&mut self, responses: &mut ResponseReceiver) -> Result<()> {
        if self.status == SessionStatus::Idle {
            return Err(SessionError::InvalidState(
                "session has not been started".to_string(),
            ));
        }

        let mut responses_open = true;

        while self.status == SessionStatus::Running {
            let Some(armed) = self.deadline.current() else {
                return Err(SessionError::InvalidState(
                    "running session has no pending response".to_string(),
                ));
            };

            tokio::select! {
                biased;

                response = responses.recv(), if responses_open => match response {
                    Some(SubjectResponse::Heard(ticket)) => {
                        self.heard_for(ticket)?;
                    }
                    None => {
                        debug!("Response channel closed, remaining trials will time out");
                        responses_open = false;
                    }
                },
                () = tokio::time::sleep_until(armed.expires_at) => {
                    self.expire(armed.ticket)?;
                }
            }
        }

        Ok(())
    }

    /// Score the current trial as heard
    ///
    /// Returns false (and does nothing) when no response is pending, e.g. a
    /// duplicate press or a press after the deadline.
    pub fn heard(&mut self) -> Result<bool> {
        if self.deadline.take().is_none() {
            debug!("Ignoring response with no pending trial");
            return Ok(false);
        }
        self.score(true)?;
        Ok(true)
    }

    /// Score the trial identified by `ticket` as heard
    ///
    /// Responses to a trial that was already scored, cancelled or replaced by
    /// a restart are ignored and return false.
    pub fn heard_for(&mut self, ticket: DeadlineTicket) -> Result<bool> {
        if !self.deadline.consume(ticket) {
            debug!("Ignoring response to {:?}, not the pending trial", ticket);
            return Ok(false);
        }
        self.score(true)?;
        Ok(true)
    }

    /// Score the current trial as missed if `ticket` is still the live deadline
    ///
    /// Stale tickets are ignored and return false.
    pub fn expire(&mut self, ticket: DeadlineTicket) -> Result<bool> {
        if !self.deadline.consume(ticket) {
            debug!("Ignoring stale deadline {:?}", ticket);
            return Ok(false);
        }
        self.score(false)?;
        Ok(true)
    }

    fn advance(&mut self) -> Result<()> {
        let Some(&frequency_hz) = self.config.frequencies.get(self.index) else {
            return self.finish_ear();
        };

        let gain = match &self.procedure {
            PairProcedure::Fixed => self.config.max_gain,
            PairProcedure::Adaptive(staircase) => staircase.current_level(),
        };

        self.deadline.arm(self.config.step_timeout())?;
        self.device.present(frequency_hz, gain, self.ear, self.config.ramp());

        let progress = TrialProgress {
            ear: self.ear,
            frequency_hz,
            index: self.index,
            total: self.config.frequencies.len(),
            gain,
            repeat: self.repeat,
        };
        debug!(
            "Presenting {} Hz to {} ear at gain {:.4} ({}/{})",
            frequency_hz,
            self.ear,
            gain,
            progress.overall_step(),
            progress.overall_total()
        );
        self.handler.on_trial_changed(&progress);

        Ok(())
    }

    fn score(&mut self, heard: bool) -> Result<()> {
        let Some(&frequency_hz) = self.config.frequencies.get(self.index) else {
            return Err(SessionError::InvalidState(format!(
                "no frequency at index {} to score",
                self.index
            )));
        };
        let range = self.config.level_range();

        // read before stopping: the achieved level, not the commanded one
        let achieved = heard.then(|| Level::from_gain(self.device.current_level(), range));
        self.device.stop();

        let outcome = match &mut self.procedure {
            PairProcedure::Fixed => Outcome::Final(achieved),
            PairProcedure::Adaptive(staircase) => {
                let step = staircase.record_response(heard);
                if step.finished {
                    Outcome::Final(Some(Level::from_db(staircase.estimate_db(), range)))
                } else {
                    Outcome::Interim(achieved)
                }
            }
        };

        match outcome {
            Outcome::Final(level) => {
                self.record(Trial {
                    frequency_hz,
                    ear: self.ear,
                    level,
                    heard,
                    is_final: true,
                });
                self.index += 1;
                self.procedure = PairProcedure::begin(&self.config)?;
                self.repeat = false;
            }
            Outcome::Interim(level) => {
                self.record(Trial {
                    frequency_hz,
                    ear: self.ear,
                    level,
                    heard,
                    is_final: false,
                });
                self.repeat = true;
            }
        }

        self.advance()
    }

    fn record(&mut self, trial: Trial) {
        debug!(
            "Recorded {} trial: {} Hz {} ear, heard={}, level={:?}",
            if trial.is_final { "final" } else { "interim" },
            trial.frequency_hz,
            trial.ear,
            trial.heard,
            trial.level_db()
        );
        self.trials.push(trial);
    }

    fn finish_ear(&mut self) -> Result<()> {
        let next = Ear::ORDER
            .iter()
            .skip_while(|&&ear| ear != self.ear)
            .nth(1)
            .copied();

        if let Some(ear) = next {
            info!("{} ear complete, switching to {} ear", self.ear, ear);
            self.ear = ear;
            self.index = 0;
            return self.advance();
        }

        self.status = SessionStatus::Finished;
        info!(
            "Hearing test finished: {} trials recorded",
            self.trials.len()
        );
        self.handler.on_session_finished(&self.trials);
        Ok(())
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status == SessionStatus::Finished
    }

    /// Frequency currently presented, `None` when idle between lists or finished
    pub fn current_frequency(&self) -> Option<u32> {
        if self.status != SessionStatus::Running {
            return None;
        }
        self.config.frequencies.get(self.index).copied()
    }

    /// Frequencies in presentation order, as configured
    pub fn frequency_list(&self) -> &[u32] {
        &self.config.frequencies
    }

    /// All recorded trials, interim ones included, in recording order
    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    /// Trials closing a frequency/ear pair
    pub fn final_trials(&self) -> impl Iterator<Item = &Trial> {
        self.trials.iter().filter(|t| t.is_final)
    }

    pub fn current_ear(&self) -> Ear {
        self.ear
    }

    /// Index into the frequency list for the current ear
    pub fn index(&self) -> usize {
        self.index
    }

    /// Frequencies per ear
    pub fn total_steps(&self) -> usize {
        self.config.frequencies.len()
    }

    /// Deadline of the trial awaiting a response
    pub fn pending_deadline(&self) -> Option<ArmedDeadline> {
        self.deadline.current()
    }

    /// Staircase of the current pair in adaptive mode
    pub fn staircase(&self) -> Option<&AdaptiveStaircase> {
        match &self.procedure {
            PairProcedure::Adaptive(staircase) if self.status == SessionStatus::Running => {
                Some(staircase)
            }
            _ => None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}
