//! Contract with the host's speech synthesis service.
//!
//! The service is single-slot: submitting a new utterance implicitly
//! replaces whatever was queued. It reports back asynchronously by sending
//! a [`SpeechEvent`] tagged with the ticket it was given.

use std::fmt;

/// Identity of one submitted utterance. Strictly increasing per player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtteranceTicket(pub u64);

impl fmt::Display for UtteranceTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub ticket: UtteranceTicket,
    pub text: String,
    pub voice: Option<String>,
    pub rate: f32,
}

/// Failure reported by the speech service for one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// The utterance was cancelled or interrupted by a newer submission.
    Interrupted,
    /// Any other engine failure (synthesis failed, voice unavailable, ...).
    Failed(String),
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechError::Interrupted => write!(f, "interrupted"),
            SpeechError::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    Ended,
    Error(SpeechError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechEvent {
    pub ticket: UtteranceTicket,
    pub outcome: SpeechOutcome,
}

impl SpeechEvent {
    pub fn ended(ticket: UtteranceTicket) -> Self {
        Self {
            ticket,
            outcome: SpeechOutcome::Ended,
        }
    }

    pub fn error(ticket: UtteranceTicket, error: SpeechError) -> Self {
        Self {
            ticket,
            outcome: SpeechOutcome::Error(error),
        }
    }
}

/// Host speech engine. Only the effect runtime talks to it, and only on
/// behalf of the utterance player.
pub trait SpeechService {
    /// Start speaking. Completion or failure is reported later as a
    /// [`SpeechEvent`] carrying `utterance.ticket`.
    fn speak(&mut self, utterance: Utterance);

    /// Drop the pending utterance, if any.
    fn cancel(&mut self);

    /// Resume an engine that paused itself without being stopped.
    fn resume(&mut self);

    fn is_paused(&self) -> bool;
}
