//! Breaks paragraph text into bounded speech units.
//!
//! Platform speech engines silently drop or truncate long utterances, so a
//! paragraph is cut at sentence boundaries into units no longer than the
//! active profile's character budget. A single sentence longer than the
//! budget is emitted whole rather than cut mid-sentence.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// A run of text up to and including trailing `.`, `!` or `?` punctuation,
/// or the unterminated tail of the paragraph.
static RE_SENTENCE_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]*[.!?]+|[^.!?]+").unwrap());

/// Split `text` into speech units of at most `max_unit_chars` characters.
///
/// Lengths are measured in `char`s. Units are trimmed and empty units are
/// never emitted. Whitespace-only input therefore yields an empty list rather
/// than one blank unit; the controller treats that as a paragraph with
/// nothing left to say and moves on after the usual pause.
pub fn split_units(text: &str, max_unit_chars: usize) -> Vec<String> {
    let max_unit_chars = max_unit_chars.max(1);
    if char_len(text) <= max_unit_chars {
        return non_empty_trimmed(text).into_iter().collect();
    }

    let mut units = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for span in sentence_spans(text) {
        let span_len = char_len(span);
        if current_len > 0 && current_len + span_len > max_unit_chars {
            units.extend(non_empty_trimmed(&current));
            current.clear();
            current_len = 0;
        }
        current.push_str(span);
        current_len += span_len;
    }
    units.extend(non_empty_trimmed(&current));

    debug!(
        chars = char_len(text),
        max_unit_chars,
        units = units.len(),
        "Split paragraph into speech units"
    );
    units
}

/// Sentence-like spans covering the whole input, in order.
pub fn sentence_spans(text: &str) -> impl Iterator<Item = &str> {
    RE_SENTENCE_SPAN.find_iter(text).map(|m| m.as_str())
}

fn non_empty_trimmed(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
