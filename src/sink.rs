//! Position sinks for the terminal.

use readaloud_core::{
    Book, ChapterChangedEvent, PlaybackState, PositionEvent, PositionSink, ReaderEvent,
};
use std::io::Write;
use tracing::warn;

const BAR_WIDTH: usize = 20;

/// Human-readable progress: chapter headings, the paragraph being read and
/// a progress bar.
pub struct ConsoleSink<W: Write> {
    book: Book,
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(book: Book, out: W) -> Self {
        Self { book, out }
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            warn!("Failed to write console output: {err}");
        }
    }
}

fn progress_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

impl<W: Write> PositionSink for ConsoleSink<W> {
    fn on_position(&mut self, event: &PositionEvent) {
        let text = self
            .book
            .chapter(event.chapter_index)
            .and_then(|chapter| chapter.paragraph(event.paragraph_index))
            .map(|unit| unit.text().unwrap_or("* * *").to_string())
            .unwrap_or_default();
        let percent = event.progress.percent();
        self.line(format_args!(
            "{} {:>3.0}% ¶{} {}",
            progress_bar(percent),
            percent,
            event.paragraph_index,
            text
        ));
    }

    fn on_chapter_changed(&mut self, event: &ChapterChangedEvent) {
        match &event.subtitle {
            Some(subtitle) => self.line(format_args!(
                "== Chapter {}: {} ({subtitle}) ==",
                event.ordinal, event.title
            )),
            None => self.line(format_args!(
                "== Chapter {}: {} ==",
                event.ordinal, event.title
            )),
        }
    }

    fn on_state_changed(&mut self, state: PlaybackState) {
        let label = match state {
            PlaybackState::Playing => "playing",
            PlaybackState::Stopped => "stopped",
        };
        self.line(format_args!("-- {label} --"));
    }

    fn on_book_complete(&mut self) {
        let title = self.book.title.clone();
        self.line(format_args!("== Finished {title} =="));
    }
}

/// One JSON object per line, for a UI process reading our stdout.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, event: &ReaderEvent) {
        let result = serde_json::to_writer(&mut self.out, event)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(self.out))
            .and_then(|_| self.out.flush());
        if let Err(err) = result {
            warn!("Failed to write reader event: {err}");
        }
    }
}

impl<W: Write> PositionSink for JsonLinesSink<W> {
    fn on_position(&mut self, event: &PositionEvent) {
        self.emit(&ReaderEvent::Position(*event));
    }

    fn on_chapter_changed(&mut self, event: &ChapterChangedEvent) {
        self.emit(&ReaderEvent::ChapterChanged(event.clone()));
    }

    fn on_state_changed(&mut self, state: PlaybackState) {
        self.emit(&ReaderEvent::State { state });
    }

    fn on_book_complete(&mut self) {
        self.emit(&ReaderEvent::BookComplete);
    }
}
