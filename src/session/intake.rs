//! Bounded hand-off of externally submitted patterns.
//!
//! Producers (e.g. a request handler) hold a [`PatternSender`]; the
//! simulation loop holds the [`PatternIntake`] and polls it without blocking
//! between ticks. The queue holds [`INTAKE_CAPACITY`] patterns; a blocking
//! submit waits for the loop to drain a slot.

use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};

use crate::pattern::Pattern;
use crate::schema::INTAKE_CAPACITY;

/// Create a connected sender/intake pair.
pub fn pattern_intake() -> (PatternSender, PatternIntake) {
    let (sender, receiver) = mpsc::sync_channel(INTAKE_CAPACITY);
    (
        PatternSender { sender },
        PatternIntake {
            receiver,
            disconnected: false,
        },
    )
}

/// Errors returned to pattern producers.
#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Pattern intake is full")]
    Full(Pattern),
    #[error("Pattern intake is closed")]
    Closed(Pattern),
}

impl IntakeError {
    /// Recover the pattern that could not be queued.
    pub fn into_pattern(self) -> Pattern {
        match self {
            IntakeError::Full(p) | IntakeError::Closed(p) => p,
        }
    }
}

/// Producer side of the intake queue.
#[derive(Debug, Clone)]
pub struct PatternSender {
    sender: SyncSender<Pattern>,
}

impl PatternSender {
    /// Queue a pattern, blocking while the queue is full.
    pub fn submit(&self, pattern: Pattern) -> Result<(), IntakeError> {
        self.sender
            .send(pattern)
            .map_err(|mpsc::SendError(p)| IntakeError::Closed(p))
    }

    /// Queue a pattern, failing immediately when the queue is full.
    pub fn try_submit(&self, pattern: Pattern) -> Result<(), IntakeError> {
        self.sender.try_send(pattern).map_err(|e| match e {
            TrySendError::Full(p) => IntakeError::Full(p),
            TrySendError::Disconnected(p) => IntakeError::Closed(p),
        })
    }
}

/// Consumer side of the intake queue, owned by the simulation loop.
#[derive(Debug)]
pub struct PatternIntake {
    receiver: Receiver<Pattern>,
    disconnected: bool,
}

impl PatternIntake {
    /// Take the next queued pattern without waiting.
    pub fn poll(&mut self) -> Option<Pattern> {
        match self.receiver.try_recv() {
            Ok(pattern) => Some(pattern),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if !self.disconnected {
                    log::info!("All pattern producers have disconnected");
                    self.disconnected = true;
                }
                None
            }
        }
    }

    /// True once every sender has been dropped and the queue is drained.
    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}
