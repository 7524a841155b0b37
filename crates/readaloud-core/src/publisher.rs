//! Position events consumed by the reading UI.
//!
//! The controller emits these through [`crate::Effect`]s; the host forwards
//! them to a [`PositionSink`] that moves the highlight, progress bar and
//! counters.

use crate::state::PlaybackState;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct Progress {
    /// Speakable paragraphs before the current one.
    pub spoken: usize,
    /// Speakable paragraphs in the chapter.
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.spoken as f64 / self.total as f64) * 100.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct PositionEvent {
    pub chapter_index: usize,
    pub paragraph_index: usize,
    pub is_section_break: bool,
    pub progress: Progress,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct ChapterChangedEvent {
    pub chapter_index: usize,
    pub ordinal: usize,
    pub title: String,
    pub subtitle: Option<String>,
}

/// Envelope for line-oriented transports (one JSON object per event).
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(tag = "event", rename_all = "snake_case")]
#[ts(export)]
pub enum ReaderEvent {
    Position(PositionEvent),
    ChapterChanged(ChapterChangedEvent),
    State { state: PlaybackState },
    BookComplete,
}

/// Receiver for everything the UI needs to stay in step with playback.
pub trait PositionSink {
    fn on_position(&mut self, event: &PositionEvent);

    fn on_chapter_changed(&mut self, event: &ChapterChangedEvent);

    fn on_state_changed(&mut self, state: PlaybackState);

    fn on_book_complete(&mut self);
}
