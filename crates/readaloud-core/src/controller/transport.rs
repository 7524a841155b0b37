//! Entry points the reading UI may call.

use super::{PlaybackController, clamp_rate};
use crate::book::Book;
use crate::effect::Effect;
use crate::state::{Direction, PlaybackPosition, PlaybackState};
use tracing::{debug, info, warn};

impl PlaybackController {
    pub(super) fn handle_play(&mut self, effects: &mut Vec<Effect>) {
        if self.state.is_playing() {
            debug!("Play requested while already playing");
            return;
        }
        if self.book.chapters.is_empty() {
            warn!("Play requested with no chapters loaded");
            return;
        }
        info!(
            chapter = self.position.chapter_index,
            paragraph = self.position.paragraph_index,
            "Starting playback"
        );
        self.state = PlaybackState::Playing;
        self.begin_run(effects);
        effects.push(Effect::StateChanged(PlaybackState::Playing));
        self.advance(self.position.paragraph_index, effects);
    }

    pub(super) fn handle_stop(&mut self, effects: &mut Vec<Effect>) {
        if !self.state.is_playing() {
            return;
        }
        info!(
            chapter = self.position.chapter_index,
            paragraph = self.position.paragraph_index,
            "Stopping playback"
        );
        self.state = PlaybackState::Stopped;
        self.epoch = self.epoch.next();
        self.queue.clear();
        self.player.cancel(effects);
        effects.push(Effect::StateChanged(PlaybackState::Stopped));
    }

    pub(super) fn handle_toggle(&mut self, effects: &mut Vec<Effect>) {
        if self.state.is_playing() {
            self.handle_stop(effects);
        } else {
            self.handle_play(effects);
        }
    }

    pub(super) fn handle_jump_to(&mut self, paragraph_index: usize, effects: &mut Vec<Effect>) {
        let len = self.cursor().len();
        if paragraph_index >= len {
            warn!(paragraph_index, len, "Ignoring jump outside the chapter");
            return;
        }
        self.handle_stop(effects);
        info!(paragraph_index, "Jumping to paragraph");
        self.position.paragraph_index = paragraph_index;
        self.publish(effects);
        self.handle_play(effects);
    }

    pub(super) fn handle_skip_chapter(&mut self, direction: Direction, effects: &mut Vec<Effect>) {
        self.handle_stop(effects);
        let current = self.position.chapter_index;
        let target = match direction {
            Direction::Forward => current.checked_add(1),
            Direction::Backward => current.checked_sub(1),
        };
        let Some(target) = target.filter(|idx| *idx < self.book.chapter_count()) else {
            debug!(current, ?direction, "No chapter in that direction");
            return;
        };
        info!(from = current, to = target, "Skipping chapter");
        self.enter_chapter(target, effects);
        self.publish(effects);
    }

    pub(super) fn handle_step_paragraph(&mut self, direction: Direction, effects: &mut Vec<Effect>) {
        self.handle_stop(effects);
        let cursor = self.cursor();
        let current = self.position.paragraph_index;
        let target = match direction {
            Direction::Forward => {
                let next = cursor.next_speakable(current.saturating_add(1));
                (next < cursor.len()).then_some(next)
            }
            Direction::Backward => {
                let prev = cursor.prev_speakable(current.saturating_sub(1));
                (prev < cursor.len()).then_some(prev)
            }
        };
        match target {
            Some(target) if target != current => {
                debug!(from = current, to = target, "Stepped paragraph");
                self.position.paragraph_index = target;
            }
            _ => debug!(current, ?direction, "No paragraph in that direction"),
        }
        self.publish(effects);
    }

    pub(super) fn handle_set_voice(&mut self, voice: Option<String>, effects: &mut Vec<Effect>) {
        if self.voice.voice == voice {
            return;
        }
        info!(voice = voice.as_deref().unwrap_or("default"), "Changed voice");
        self.voice.voice = voice;
        self.restart_paragraph(effects);
    }

    pub(super) fn handle_set_rate(&mut self, rate: f32, effects: &mut Vec<Effect>) {
        let Some(clamped) = clamp_rate(rate) else {
            warn!(rate, "Ignoring non-finite speech rate");
            return;
        };
        if (clamped - self.voice.rate).abs() <= f32::EPSILON {
            return;
        }
        info!(rate = clamped, "Changed speech rate");
        self.voice.rate = clamped;
        self.restart_paragraph(effects);
    }

    pub(super) fn handle_load_book(&mut self, book: Book, effects: &mut Vec<Effect>) {
        self.handle_stop(effects);
        info!(
            id = %book.id,
            title = %book.title,
            chapters = book.chapter_count(),
            "Loaded book"
        );
        self.book = book;
        self.epoch = self.epoch.next();
        self.queue.clear();
        self.last_published = None;
        self.position = self.chapter_start(0);
        if self.book.chapters.is_empty() {
            return;
        }
        self.announce_chapter(effects);
        self.publish(effects);
    }

    pub(super) fn handle_switch_chapter(&mut self, chapter_index: usize, effects: &mut Vec<Effect>) {
        if chapter_index >= self.book.chapter_count() {
            warn!(chapter_index, "Ignoring switch to missing chapter");
            return;
        }
        self.handle_stop(effects);
        self.enter_chapter(chapter_index, effects);
        self.publish(effects);
    }

    /// Make `chapter_index` current, positioned on its first speakable paragraph.
    pub(super) fn enter_chapter(&mut self, chapter_index: usize, effects: &mut Vec<Effect>) {
        self.queue.clear();
        self.position = self.chapter_start(chapter_index);
        self.announce_chapter(effects);
    }

    /// Start a fresh run: new epoch and, where the platform needs it, a
    /// resume watchdog bound to that epoch.
    fn begin_run(&mut self, effects: &mut Vec<Effect>) {
        self.epoch = self.epoch.next();
        self.player.start_watchdog(self.epoch, effects);
    }

    /// Re-speak the current paragraph with the latest voice settings.
    ///
    /// Between units nothing is speaking, and whichever continuation is
    /// pending reads the new settings when it speaks next.
    fn restart_paragraph(&mut self, effects: &mut Vec<Effect>) {
        if !self.state.is_playing() {
            return;
        }
        if !self.player.is_busy() {
            debug!("Voice settings apply from the next unit");
            return;
        }
        let PlaybackPosition {
            paragraph_index, ..
        } = self.position;
        self.queue.clear();
        self.player.cancel(effects);
        self.begin_run(effects);
        self.advance(paragraph_index, effects);
    }
}
