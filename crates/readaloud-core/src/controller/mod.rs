//! Playback state machine.
//!
//! [`PlaybackController::reduce`] is the only way playback changes. It
//! takes transport commands, speech-engine reports and fired timers, and
//! returns the effects the host must perform. Every scheduled timer carries
//! the epoch current when it was scheduled; anything that stops or restarts
//! playback bumps the epoch, so continuations from an older run are dropped
//! on arrival.

mod sequencing;
mod transport;


use crate::book::{Book, Chapter, ParagraphUnit};
use crate::cursor::ParagraphCursor;
use crate::effect::{Effect, Epoch, Message};
use crate::player::{PlayerTiming, UtterancePlayer};
use crate::profile::PlaybackProfile;
use crate::publisher::{ChapterChangedEvent, PositionEvent, Progress};
use crate::state::{PlaybackPosition, PlaybackState};
use std::collections::VecDeque;

pub const MIN_SPEECH_RATE: f32 = 0.1;
pub const MAX_SPEECH_RATE: f32 = 10.0;

/// `None` for NaN and infinities, which the engine cannot honour.
fn clamp_rate(rate: f32) -> Option<f32> {
    rate.is_finite().then(|| rate.clamp(MIN_SPEECH_RATE, MAX_SPEECH_RATE))
}

/// Voice selection forwarded with every utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    pub voice: Option<String>,
    pub rate: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            voice: None,
            rate: 1.0,
        }
    }
}

pub struct PlaybackController {
    book: Book,
    profile: PlaybackProfile,
    voice: VoiceSettings,
    position: PlaybackPosition,
    state: PlaybackState,
    epoch: Epoch,
    /// Speech units left in the paragraph being read.
    queue: VecDeque<String>,
    player: UtterancePlayer,
    last_published: Option<PositionEvent>,
}

impl PlaybackController {
    pub fn new(book: Book, profile: PlaybackProfile, voice: VoiceSettings) -> Self {
        let player = UtterancePlayer::new(PlayerTiming::from(&profile));
        let mut controller = Self {
            book,
            profile,
            voice: VoiceSettings {
                rate: clamp_rate(voice.rate).unwrap_or(1.0),
                ..voice
            },
            position: PlaybackPosition::default(),
            state: PlaybackState::Stopped,
            epoch: Epoch::default(),
            queue: VecDeque::new(),
            player,
            last_published: None,
        };
        controller.position = controller.chapter_start(0);
        controller
    }

    pub fn reduce(&mut self, message: Message) -> Vec<Effect> {
        let mut effects = Vec::new();

        match message {
            Message::Play => self.handle_play(&mut effects),
            Message::Stop => self.handle_stop(&mut effects),
            Message::Toggle => self.handle_toggle(&mut effects),
            Message::JumpTo(idx) => self.handle_jump_to(idx, &mut effects),
            Message::SkipChapter(direction) => self.handle_skip_chapter(direction, &mut effects),
            Message::StepParagraph(direction) => {
                self.handle_step_paragraph(direction, &mut effects)
            }
            Message::SetVoice(voice) => self.handle_set_voice(voice, &mut effects),
            Message::SetRate(rate) => self.handle_set_rate(rate, &mut effects),
            Message::LoadBook(book) => self.handle_load_book(book, &mut effects),
            Message::SwitchChapter(idx) => self.handle_switch_chapter(idx, &mut effects),
            Message::Speech(event) => self.handle_speech_event(event, &mut effects),
            Message::TimerFired(timer) => self.handle_timer(timer, &mut effects),
        }

        effects
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn position(&self) -> PlaybackPosition {
        self.position
    }

    pub fn voice(&self) -> &VoiceSettings {
        &self.voice
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn progress(&self) -> Progress {
        let cursor = self.cursor();
        Progress {
            spoken: cursor.progress_count(self.position.paragraph_index),
            total: cursor.speakable_total(),
        }
    }

    /// Snapshot of the current position as the UI sees it.
    pub fn position_event(&self) -> PositionEvent {
        let is_section_break = self
            .chapter()
            .and_then(|chapter| chapter.paragraph(self.position.paragraph_index))
            .is_some_and(ParagraphUnit::is_section_break);
        PositionEvent {
            chapter_index: self.position.chapter_index,
            paragraph_index: self.position.paragraph_index,
            is_section_break,
            progress: self.progress(),
        }
    }

    fn chapter(&self) -> Option<&Chapter> {
        self.book.chapter(self.position.chapter_index)
    }

    fn cursor(&self) -> ParagraphCursor<'_> {
        let paragraphs = self
            .chapter()
            .map(|chapter| chapter.paragraphs.as_slice())
            .unwrap_or_default();
        ParagraphCursor::new(paragraphs)
    }

    fn chapter_start(&self, chapter_index: usize) -> PlaybackPosition {
        let first = self
            .book
            .chapter(chapter_index)
            .map(|chapter| ParagraphCursor::new(&chapter.paragraphs).next_speakable(0))
            .unwrap_or(0);
        PlaybackPosition::new(chapter_index, first)
    }

    fn publish(&mut self, effects: &mut Vec<Effect>) {
        let event = self.position_event();
        if self.last_published == Some(event) {
            return;
        }
        self.last_published = Some(event);
        effects.push(Effect::Publish(event));
    }

    fn announce_chapter(&self, effects: &mut Vec<Effect>) {
        if let Some(chapter) = self.chapter() {
            effects.push(Effect::ChapterChanged(ChapterChangedEvent {
                chapter_index: self.position.chapter_index,
                ordinal: chapter.ordinal,
                title: chapter.title.clone(),
                subtitle: chapter.subtitle.clone(),
            }));
        }
    }
}
