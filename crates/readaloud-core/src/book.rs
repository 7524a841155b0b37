//! Book, chapter and paragraph model handed to the playback engine.
//!
//! Everything here is immutable once loaded; a new book replaces the old one
//! wholesale rather than being edited in place.

use serde::{Deserialize, Serialize};

/// One unit of chapter text. Position in the chapter is its index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum ParagraphUnit {
    Text(String),
    SectionBreak,
}

impl ParagraphUnit {
    pub fn is_section_break(&self) -> bool {
        matches!(self, ParagraphUnit::SectionBreak)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            ParagraphUnit::Text(text) => Some(text.as_str()),
            ParagraphUnit::SectionBreak => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub ordinal: usize,
    pub title: String,
    pub subtitle: Option<String>,
    pub paragraphs: Vec<ParagraphUnit>,
}

impl Chapter {
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn paragraph(&self, idx: usize) -> Option<&ParagraphUnit> {
        self.paragraphs.get(idx)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub chapters: Vec<Chapter>,
}

impl Book {
    pub fn chapter(&self, idx: usize) -> Option<&Chapter> {
        self.chapters.get(idx)
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Placeholder used before any book is loaded.
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            subtitle: None,
            chapters: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_chapters(chapters: &[&[&str]]) -> Self {
        let chapters = chapters
            .iter()
            .enumerate()
            .map(|(idx, paragraphs)| Chapter {
                ordinal: idx + 1,
                title: format!("Chapter {}", idx + 1),
                subtitle: None,
                paragraphs: paragraphs
                    .iter()
                    .map(|p| {
                        if *p == "§" {
                            ParagraphUnit::SectionBreak
                        } else {
                            ParagraphUnit::Text(p.to_string())
                        }
                    })
                    .collect(),
            })
            .collect();
        Self {
            id: "test-book".to_string(),
            title: "Test Book".to_string(),
            subtitle: None,
            chapters,
        }
    }
}
