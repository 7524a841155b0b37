use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
}

impl PlaybackState {
    pub fn is_playing(self) -> bool {
        matches!(self, PlaybackState::Playing)
    }
}

/// Where the reader is. `paragraph_index == chapter length` is the
/// chapter-end sentinel; at the last chapter it doubles as book end.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[ts(export)]
pub struct PlaybackPosition {
    pub chapter_index: usize,
    pub paragraph_index: usize,
}

impl PlaybackPosition {
    pub fn new(chapter_index: usize, paragraph_index: usize) -> Self {
        Self {
            chapter_index,
            paragraph_index,
        }
    }
}

/// Direction for paragraph and chapter stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}
