//! Drives the speech service through one utterance at a time.
//!
//! Every `speak` cancels whatever the engine holds, waits a short grace
//! period, then submits. Completion is reported to the controller only
//! after a settle delay. Engine failures are downgraded to "skip this unit";
//! interruptions are absorbed silently.

use crate::effect::{Effect, Epoch, Timer, TimerKind};
use crate::profile::PlaybackProfile;
use crate::speech::{SpeechError, SpeechEvent, SpeechOutcome, Utterance, UtteranceTicket};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Result of one speech unit, as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    Completed,
    Cancelled,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerTiming {
    pub submit_delay: Duration,
    pub settle_delay: Duration,
    pub resume_watchdog: Option<Duration>,
}

impl From<&PlaybackProfile> for PlayerTiming {
    fn from(profile: &PlaybackProfile) -> Self {
        Self {
            submit_delay: profile.submit_delay,
            settle_delay: profile.settle_delay,
            resume_watchdog: profile.resume_watchdog,
        }
    }
}

#[derive(Debug)]
pub struct UtterancePlayer {
    timing: PlayerTiming,
    last_ticket: UtteranceTicket,
    /// Waiting out the submit delay.
    pending: Option<Utterance>,
    /// Handed to the engine, no outcome yet.
    in_flight: Option<UtteranceTicket>,
}

impl UtterancePlayer {
    pub fn new(timing: PlayerTiming) -> Self {
        Self {
            timing,
            last_ticket: UtteranceTicket(0),
            pending: None,
            in_flight: None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<UtteranceTicket> {
        self.in_flight
    }

    pub fn is_current(&self, ticket: UtteranceTicket) -> bool {
        ticket == self.last_ticket
    }

    /// Queue `text` for submission after the platform's grace period.
    pub fn speak(
        &mut self,
        text: String,
        voice: Option<String>,
        rate: f32,
        epoch: Epoch,
        effects: &mut Vec<Effect>,
    ) -> UtteranceTicket {
        self.cancel(effects);
        self.last_ticket = UtteranceTicket(self.last_ticket.0.wrapping_add(1));
        let ticket = self.last_ticket;
        trace!(%ticket, chars = text.chars().count(), "Queued speech unit");
        self.pending = Some(Utterance {
            ticket,
            text,
            voice,
            rate,
        });
        effects.push(Effect::Schedule {
            delay: self.timing.submit_delay,
            timer: Timer {
                epoch,
                kind: TimerKind::SubmitUtterance(ticket),
            },
        });
        ticket
    }

    /// Submit the pending unit if it is still the one `ticket` names.
    pub fn submit(&mut self, ticket: UtteranceTicket, effects: &mut Vec<Effect>) -> bool {
        match self.pending.take() {
            Some(utterance) if utterance.ticket == ticket => {
                debug!(%ticket, "Submitting utterance");
                self.in_flight = Some(ticket);
                effects.push(Effect::Submit(utterance));
                true
            }
            other => {
                debug!(%ticket, "Dropping submit for superseded utterance");
                self.pending = other;
                false
            }
        }
    }

    /// Classify an engine report. Returns `false` for reports about anything
    /// other than the in-flight utterance.
    pub fn on_speech_event(
        &mut self,
        event: SpeechEvent,
        epoch: Epoch,
        effects: &mut Vec<Effect>,
    ) -> bool {
        if self.in_flight != Some(event.ticket) {
            trace!(ticket = %event.ticket, "Ignoring speech event for stale utterance");
            return false;
        }
        self.in_flight = None;

        let outcome = match event.outcome {
            SpeechOutcome::Ended => UnitOutcome::Completed,
            SpeechOutcome::Error(SpeechError::Interrupted) => {
                debug!(ticket = %event.ticket, "Utterance interrupted by the engine");
                UnitOutcome::Cancelled
            }
            SpeechOutcome::Error(SpeechError::Failed(reason)) => {
                warn!(ticket = %event.ticket, %reason, "Speech engine failed; skipping unit");
                UnitOutcome::Error(reason)
            }
        };
        effects.push(Effect::Schedule {
            delay: self.timing.settle_delay,
            timer: Timer {
                epoch,
                kind: TimerKind::UnitSettled {
                    ticket: event.ticket,
                    outcome,
                },
            },
        });
        true
    }

    /// Tell the engine to drop everything and forget local bookkeeping.
    pub fn cancel(&mut self, effects: &mut Vec<Effect>) {
        if self.is_busy() {
            debug!(ticket = %self.last_ticket, "Cancelling active utterance");
        }
        self.pending = None;
        self.in_flight = None;
        effects.push(Effect::CancelSpeech);
    }

    pub fn start_watchdog(&self, epoch: Epoch, effects: &mut Vec<Effect>) {
        if let Some(interval) = self.timing.resume_watchdog {
            effects.push(Effect::Schedule {
                delay: interval,
                timer: Timer {
                    epoch,
                    kind: TimerKind::ResumeWatchdog,
                },
            });
        }
    }

    /// Nudge the engine while something is being spoken, then re-arm.
    pub fn watchdog_tick(&self, epoch: Epoch, effects: &mut Vec<Effect>) {
        if self.in_flight.is_some() {
            effects.push(Effect::ResumeSpeech);
        }
        self.start_watchdog(epoch, effects);
    }
}
