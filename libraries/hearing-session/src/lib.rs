//! Hearing Test - Session Orchestration
//!
//! Runs a hearing-threshold test over a frequency list for both ears.
//!
//! This crate provides:
//! - `TrialController`: presentation, response deadlines, scoring, ear switching
//! - Fixed-level and adaptive staircase modes
//! - Constructor-injected session handlers and a channel-based event stream
//! - Configuration loading (TOML file + `HEARING_` environment variables)
//! - Per-ear dB HL reports with interpolated audiograms
//!
//! # Architecture
//!
//! The controller never touches audio directly. Tone synthesis is provided by
//! the platform through the [`StimulusDevice`] trait; subject input arrives as
//! [`SubjectResponse`]s on a tokio channel. Every response is stamped with the
//! trial awaiting it when it was sent, so presses never carry over to a later
//! trial.
//!
//! # Example
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use hearing_core::Ear;
//! use hearing_session::{
//!     ChannelHandler, RampShape, SessionConfig, SessionReport, StimulusDevice, TrialController,
//! };
//!
//! struct MyToneGenerator;
//!
//! #[async_trait]
//! impl StimulusDevice for MyToneGenerator {
//!     async fn init(&mut self) -> hearing_session::Result<()> {
//!         Ok(())
//!     }
//!     fn present(&mut self, _frequency_hz: u32, _gain: f64, _ear: Ear, _ramp: RampShape) {}
//!     fn stop(&mut self) {}
//!     fn current_level(&self) -> f64 {
//!         0.0
//!     }
//! }
//!
//! # async fn example() -> hearing_session::Result<()> {
//! let (handler, _events) = ChannelHandler::new();
//! let mut controller = TrialController::new(SessionConfig::default(), MyToneGenerator, handler);
//! let (button, mut responses) = controller.response_channel();
//! controller.start().await?;
//!
//! // hand `button` to the UI; `button.heard()` on every press
//! # drop(button);
//! controller.run(&mut responses).await?;
//!
//! let report = SessionReport::from_trials(controller.trials(), controller.frequency_list())?;
//! println!("{}", report.to_json()?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
mod controller;
mod deadline;
mod device;
mod error;
pub mod events;
mod report;

pub use config::{RampShape, SessionConfig, TestMode, TestProfile};
pub use controller::{
    ResponseReceiver, ResponseSender, SessionStatus, SubjectResponse, TrialController,
};
pub use deadline::{ArmedDeadline, DeadlineTicket};
pub use device::StimulusDevice;
pub use error::{Result, SessionError};
pub use events::{ChannelHandler, NoopHandler, SessionEvent, SessionHandler, TrialProgress};
pub use report::{EarReport, SessionReport};
