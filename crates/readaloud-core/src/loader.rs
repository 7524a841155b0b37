//! Book directory loading.
//!
//! A book is a directory holding `book.toml` plus one plain-text file per
//! chapter. Chapter files are split into paragraphs on blank lines; a
//! paragraph consisting only of a divider such as `***` becomes a section
//! break.

use crate::book::{Book, Chapter, ParagraphUnit};
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;

pub const MANIFEST_FILE: &str = "book.toml";

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

const BREAK_MARKERS: &[&str] = &["§", "#", "***", "* * *", "---", "~"];

#[derive(Debug, Deserialize)]
struct Manifest {
    id: String,
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
    #[serde(default)]
    chapters: Vec<ManifestChapter>,
}

#[derive(Debug, Deserialize)]
struct ManifestChapter {
    file: String,
    title: String,
    #[serde(default)]
    subtitle: Option<String>,
}

/// Load the book rooted at `dir`.
///
/// A missing or malformed manifest is an error. A chapter whose file cannot
/// be read is kept with no paragraphs so playback passes straight through it.
pub fn load_book(dir: &Path) -> Result<Book> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let raw = fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let manifest: Manifest = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", manifest_path.display()))?;

    let chapters = manifest
        .chapters
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            let path = dir.join(&entry.file);
            let paragraphs = match fs::read_to_string(&path) {
                Ok(text) => parse_paragraphs(&text),
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        "Chapter file unreadable, treating as empty: {err}"
                    );
                    Vec::new()
                }
            };
            debug!(
                ordinal = idx + 1,
                paragraphs = paragraphs.len(),
                "Loaded chapter"
            );
            Chapter {
                ordinal: idx + 1,
                title: entry.title,
                subtitle: entry.subtitle,
                paragraphs,
            }
        })
        .collect::<Vec<_>>();

    info!(
        path = %dir.display(),
        id = %manifest.id,
        chapters = chapters.len(),
        "Loaded book"
    );
    Ok(Book {
        id: manifest.id,
        title: manifest.title,
        subtitle: manifest.subtitle,
        chapters,
    })
}

/// Split chapter text into paragraph units.
pub fn parse_paragraphs(text: &str) -> Vec<ParagraphUnit> {
    let text: String = text.replace("\r\n", "\n").nfc().collect();
    RE_BLANK_LINES
        .split(&text)
        .filter_map(|block| {
            let joined = block
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if joined.is_empty() {
                None
            } else if is_break_marker(&joined) {
                Some(ParagraphUnit::SectionBreak)
            } else {
                Some(ParagraphUnit::Text(joined))
            }
        })
        .collect()
}

fn is_break_marker(paragraph: &str) -> bool {
    BREAK_MARKERS.contains(&paragraph)
}
