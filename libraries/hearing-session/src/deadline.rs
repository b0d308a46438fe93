//! Single-owner response deadline
//!
//! At most one deadline is armed at a time. Arming requires the previous one
//! to have been cancelled or consumed, and every armed deadline carries a
//! ticket so a stale expiry can be told apart from the live one. The live
//! ticket is published on a watch channel for response senders to stamp
//! their presses with.

use crate::error::{Result, SessionError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Identifies one armed deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeadlineTicket(u64);

/// An armed deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedDeadline {
    pub ticket: DeadlineTicket,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct ResponseDeadline {
    armed: Option<ArmedDeadline>,
    next_ticket: u64,
    live: watch::Sender<Option<DeadlineTicket>>,
}

impl Default for ResponseDeadline {
    fn default() -> Self {
        let (live, _) = watch::channel(None);
        Self {
            armed: None,
            next_ticket: 0,
            live,
        }
    }
}

impl ResponseDeadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the ticket of the armed deadline (`None` while disarmed)
    pub fn subscribe(&self) -> watch::Receiver<Option<DeadlineTicket>> {
        self.live.subscribe()
    }

    fn publish(&self) {
        self.live.send_replace(self.armed.map(|armed| armed.ticket));
    }

    /// Arm a deadline `timeout` from now
    ///
    /// Fails if one is already armed.
    pub fn arm(&mut self, timeout: Duration) -> Result<ArmedDeadline> {
        if let Some(live) = self.armed {
            return Err(SessionError::InvalidState(format!(
                "response deadline {:?} is still armed",
                live.ticket
            )));
        }

        let armed = ArmedDeadline {
            ticket: DeadlineTicket(self.next_ticket),
            expires_at: Instant::now() + timeout,
        };
        self.next_ticket += 1;
        self.armed = Some(armed);
        self.publish();
        Ok(armed)
    }

    /// Consume the armed deadline, whatever its ticket
    pub fn take(&mut self) -> Option<ArmedDeadline> {
        let taken = self.armed.take();
        self.publish();
        taken
    }

    /// Consume the armed deadline only if it is `ticket`
    ///
    /// Returns false for stale or unknown tickets.
    pub fn consume(&mut self, ticket: DeadlineTicket) -> bool {
        match self.armed {
            Some(live) if live.ticket == ticket => {
                self.armed = None;
                self.publish();
                true
            }
            _ => false,
        }
    }

    /// Drop any armed deadline
    pub fn cancel(&mut self) -> bool {
        self.take().is_some()
    }

    pub fn current(&self) -> Option<ArmedDeadline> {
        self.armed
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}
