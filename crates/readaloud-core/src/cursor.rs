//! Navigation over a chapter's paragraph sequence.

use crate::book::ParagraphUnit;

/// Read-only view over one chapter's paragraphs.
#[derive(Debug, Clone, Copy)]
pub struct ParagraphCursor<'a> {
    paragraphs: &'a [ParagraphUnit],
}

impl<'a> ParagraphCursor<'a> {
    pub fn new(paragraphs: &'a [ParagraphUnit]) -> Self {
        Self { paragraphs }
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn is_speakable(&self, idx: usize) -> bool {
        matches!(self.paragraphs.get(idx), Some(ParagraphUnit::Text(_)))
    }

    /// Smallest speakable index `>= from`, or `len()` when the rest of the
    /// chapter holds nothing to speak.
    pub fn next_speakable(&self, from: usize) -> usize {
        (from..self.len())
            .find(|&idx| self.is_speakable(idx))
            .unwrap_or(self.len())
    }

    /// Largest speakable index `<= from`.
    ///
    /// When nothing speakable precedes `from` this falls forward to the first
    /// speakable paragraph of the chapter (or `len()` for a chapter with
    /// none), so the result never lands on a section break.
    pub fn prev_speakable(&self, from: usize) -> usize {
        if self.is_empty() {
            return 0;
        }
        let from = from.min(self.len() - 1);
        (0..=from)
            .rev()
            .find(|&idx| self.is_speakable(idx))
            .unwrap_or_else(|| self.next_speakable(0))
    }

    /// Whether any section break sits in `from..to`.
    pub fn crosses_break(&self, from: usize, to: usize) -> bool {
        let to = to.min(self.len());
        from < to
            && self.paragraphs[from..to]
                .iter()
                .any(ParagraphUnit::is_section_break)
    }

    /// Speakable paragraphs strictly before `upto`.
    pub fn progress_count(&self, upto: usize) -> usize {
        let upto = upto.min(self.len());
        self.paragraphs[..upto]
            .iter()
            .filter(|p| !p.is_section_break())
            .count()
    }

    pub fn speakable_total(&self) -> usize {
        self.progress_count(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(labels: &[&str]) -> Vec<ParagraphUnit> {
        labels.iter()
            .map(|p| {
                if *p == "§" {
                    ParagraphUnit::SectionBreak
                } else {
                    ParagraphUnit::Text(p.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn next_speakable_skips_consecutive_breaks() {
        let paragraphs = units(&["A", "§", "§", "B"]);
        let cursor = ParagraphCursor::new(&paragraphs);
        assert_eq!(cursor.next_speakable(0), 0);
        assert_eq!(cursor.next_speakable(1), 3);
        assert_eq!(cursor.next_speakable(4), 4);
    }

    #[test]
    fn next_speakable_reports_chapter_end_after_trailing_breaks() {
        let paragraphs = units(&["A", "§", "§"]);
        let cursor = ParagraphCursor::new(&paragraphs);
        assert_eq!(cursor.next_speakable(1), 3);
    }

    #[test]
    fn empty_and_break_only_chapters_end_immediately() {
        let empty: Vec<ParagraphUnit> = Vec::new();
        assert_eq!(ParagraphCursor::new(&empty).next_speakable(0), 0);
        assert_eq!(ParagraphCursor::new(&empty).prev_speakable(3), 0);

        let breaks = units(&["§", "§"]);
        let cursor = ParagraphCursor::new(&breaks);
        assert_eq!(cursor.next_speakable(0), 2);
        assert_eq!(cursor.prev_speakable(1), 2);
    }

    #[test]
    fn prev_speakable_walks_back_over_breaks() {
        let paragraphs = units(&["A", "§", "§", "B", "C"]);
        let cursor = ParagraphCursor::new(&paragraphs);
        assert_eq!(cursor.prev_speakable(2), 0);
        assert_eq!(cursor.prev_speakable(4), 4);
        assert_eq!(cursor.prev_speakable(99), 4);
    }

    #[test]
    fn prev_speakable_falls_forward_when_chapter_opens_with_break() {
        let paragraphs = units(&["§", "A", "B"]);
        let cursor = ParagraphCursor::new(&paragraphs);
        assert_eq!(cursor.prev_speakable(0), 1);
    }

    #[test]
    fn navigation_never_lands_on_a_break() {
        let paragraphs = units(&["§", "A", "§", "B", "§", "§", "C", "§"]);
        let cursor = ParagraphCursor::new(&paragraphs);
        for from in 0..=paragraphs.len() {
            let next = cursor.next_speakable(from);
            assert!(next == paragraphs.len() || cursor.is_speakable(next));
            let prev = cursor.prev_speakable(from);
            assert!(cursor.is_speakable(prev));
        }
    }

    #[test]
    fn progress_counts_only_text_paragraphs() {
        let paragraphs = units(&["A", "§", "B", "C", "§"]);
        let cursor = ParagraphCursor::new(&paragraphs);
        assert_eq!(cursor.progress_count(0), 0);
        assert_eq!(cursor.progress_count(2), 1);
        assert_eq!(cursor.progress_count(3), 2);
        assert_eq!(cursor.progress_count(50), 3);
        assert_eq!(cursor.speakable_total(), 3);
    }

    #[test]
    fn crosses_break_detects_skipped_dividers() {
        let paragraphs = units(&["A", "§", "B", "C"]);
        let cursor = ParagraphCursor::new(&paragraphs);
        assert!(cursor.crosses_break(1, 2));
        assert!(!cursor.crosses_break(2, 3));
        assert!(!cursor.crosses_break(3, 3));
    }
}
