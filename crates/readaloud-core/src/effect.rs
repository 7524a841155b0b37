//! Inputs and outputs of the playback reducer.
//!
//! The controller never sleeps, spawns or calls the speech engine itself.
//! It consumes [`Message`]s and returns [`Effect`]s for the host runtime to
//! carry out; timers come back as [`Message::TimerFired`].

use crate::book::Book;
use crate::player::UnitOutcome;
use crate::publisher::{ChapterChangedEvent, PositionEvent};
use crate::speech::{SpeechEvent, Utterance, UtteranceTicket};
use crate::state::{Direction, PlaybackState};
use std::time::Duration;

/// Playback run identity. Bumped whenever pending continuations must die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(pub u64);

impl Epoch {
    pub fn next(self) -> Self {
        Epoch(self.0.wrapping_add(1))
    }
}

/// A scheduled continuation, stamped with the epoch that scheduled it.
#[derive(Debug, Clone, PartialEq)]
pub struct Timer {
    pub epoch: Epoch,
    pub kind: TimerKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimerKind {
    /// Post-cancel grace period elapsed; hand the unit to the engine.
    SubmitUtterance(UtteranceTicket),
    /// Post-utterance settle delay elapsed.
    UnitSettled {
        ticket: UtteranceTicket,
        outcome: UnitOutcome,
    },
    /// Continue the per-paragraph algorithm at this chapter/paragraph.
    Advance {
        chapter_index: usize,
        paragraph_index: usize,
    },
    ResumeWatchdog,
}

#[derive(Debug, Clone)]
pub enum Message {
    Play,
    Stop,
    Toggle,
    JumpTo(usize),
    SkipChapter(Direction),
    StepParagraph(Direction),
    SetVoice(Option<String>),
    SetRate(f32),
    LoadBook(Book),
    SwitchChapter(usize),
    Speech(SpeechEvent),
    TimerFired(Timer),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CancelSpeech,
    Submit(Utterance),
    ResumeSpeech,
    Schedule { delay: Duration, timer: Timer },
    Publish(PositionEvent),
    ChapterChanged(ChapterChangedEvent),
    StateChanged(PlaybackState),
    BookComplete,
}
