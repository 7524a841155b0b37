//! Per-paragraph playback: chapter ends, section breaks, speech units.

use super::PlaybackController;
use crate::book::ParagraphUnit;
use crate::effect::{Effect, Timer, TimerKind};
use crate::player::UnitOutcome;
use crate::speech::SpeechEvent;
use crate::splitter::split_units;
use crate::state::PlaybackState;
use std::time::Duration;
use tracing::{debug, info, trace};

impl PlaybackController {
    /// Continue playback at `target` in the current chapter.
    pub(super) fn advance(&mut self, target: usize, effects: &mut Vec<Effect>) {
        if !self.state.is_playing() {
            return;
        }
        let chapter_index = self.position.chapter_index;
        let len = self.cursor().len();

        if target >= len {
            self.finish_chapter(effects);
            return;
        }

        let text = match self.chapter().and_then(|chapter| chapter.paragraph(target)) {
            Some(ParagraphUnit::Text(text)) => text.clone(),
            _ => {
                let next = self.cursor().next_speakable(target);
                debug!(chapter_index, at = target, next, "Pausing for section break");
                self.schedule_advance(self.profile.section_break_pause, next, effects);
                return;
            }
        };

        self.position.paragraph_index = target;
        self.publish(effects);
        self.queue = split_units(&text, self.profile.max_unit_chars).into();
        debug!(
            chapter_index,
            paragraph = target,
            units = self.queue.len(),
            "Reading paragraph"
        );
        self.speak_next_unit(effects);
    }

    fn finish_chapter(&mut self, effects: &mut Vec<Effect>) {
        let next_chapter = self.position.chapter_index + 1;
        if next_chapter < self.book.chapter_count() {
            info!(chapter = next_chapter, "Advancing to next chapter");
            self.enter_chapter(next_chapter, effects);
            self.schedule_advance(self.profile.chapter_transition_pause, 0, effects);
            return;
        }

        info!("Reached end of book");
        self.position.paragraph_index = self.cursor().len();
        self.state = PlaybackState::Stopped;
        self.epoch = self.epoch.next();
        self.queue.clear();
        effects.push(Effect::StateChanged(PlaybackState::Stopped));
        effects.push(Effect::BookComplete);
    }

    fn speak_next_unit(&mut self, effects: &mut Vec<Effect>) {
        let Some(unit) = self.queue.pop_front() else {
            self.finish_paragraph(effects);
            return;
        };
        self.player.speak(
            unit,
            self.voice.voice.clone(),
            self.voice.rate,
            self.epoch,
            effects,
        );
    }

    /// Queue exhausted: pause, then move to the next speakable paragraph.
    fn finish_paragraph(&mut self, effects: &mut Vec<Effect>) {
        let cursor = self.cursor();
        let after = self.position.paragraph_index + 1;
        let next = cursor.next_speakable(after);
        let pause = if cursor.crosses_break(after, next) {
            self.profile.section_break_pause
        } else {
            self.profile.paragraph_pause
        };
        trace!(from = self.position.paragraph_index, next, "Paragraph finished");
        self.schedule_advance(pause, next, effects);
    }

    fn schedule_advance(&self, delay: Duration, paragraph_index: usize, effects: &mut Vec<Effect>) {
        effects.push(Effect::Schedule {
            delay,
            timer: Timer {
                epoch: self.epoch,
                kind: TimerKind::Advance {
                    chapter_index: self.position.chapter_index,
                    paragraph_index,
                },
            },
        });
    }

    pub(super) fn handle_speech_event(&mut self, event: SpeechEvent, effects: &mut Vec<Effect>) {
        if !self.state.is_playing() {
            trace!(ticket = %event.ticket, "Speech event while stopped");
            return;
        }
        self.player.on_speech_event(event, self.epoch, effects);
    }

    pub(super) fn handle_timer(&mut self, timer: Timer, effects: &mut Vec<Effect>) {
        if timer.epoch != self.epoch || !self.state.is_playing() {
            trace!(?timer, current = ?self.epoch, "Dropping stale continuation");
            return;
        }

        match timer.kind {
            TimerKind::SubmitUtterance(ticket) => {
                self.player.submit(ticket, effects);
            }
            TimerKind::UnitSettled { ticket, outcome } => {
                if !self.player.is_current(ticket) {
                    trace!(%ticket, "Dropping settle for superseded utterance");
                    return;
                }
                match outcome {
                    UnitOutcome::Completed => trace!(%ticket, "Unit completed"),
                    UnitOutcome::Cancelled => debug!(%ticket, "Unit cancelled by engine"),
                    UnitOutcome::Error(reason) => debug!(%ticket, %reason, "Unit skipped"),
                }
                self.speak_next_unit(effects);
            }
            TimerKind::Advance {
                chapter_index,
                paragraph_index,
            } => {
                if chapter_index != self.position.chapter_index {
                    trace!(chapter_index, "Dropping continuation for another chapter");
                    return;
                }
                self.advance(paragraph_index, effects);
            }
            TimerKind::ResumeWatchdog => self.player.watchdog_tick(self.epoch, effects),
        }
    }
}
