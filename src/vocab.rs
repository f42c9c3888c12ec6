//! Known-word and stopword sets.
//!
//! Both sets are loaded once at startup and stay immutable for the run. A
//! missing file is downgraded to a warning and an empty set so a learner can
//! run the extraction before they have exported anything from Anki; a file
//! that exists but cannot be parsed is a fatal error.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

/// Membership filter over the two exclusion sets.
#[derive(Debug, Clone, Default)]
pub struct VocabFilter {
    known: HashSet<String>,
    stopwords: HashSet<String>,
}

impl VocabFilter {
    pub fn new(known: HashSet<String>, stopwords: HashSet<String>) -> Self {
        Self { known, stopwords }
    }

    /// A token is relevant unless its lowercase form is already known or a
    /// stopword. The token itself keeps its original case.
    pub fn is_relevant(&self, token: &str) -> bool {
        let lower = token.to_lowercase();
        !self.known.contains(&lower) && !self.stopwords.contains(&lower)
    }
}

/// Load the known-vocabulary CSV into a lowercase set.
///
/// The file is header-addressed: a `term` column is used when present
/// (LingQ-style exports), otherwise the first column (the `Word` list
/// produced by `known-words`).
pub fn load_known_words(path: &Path) -> Result<HashSet<String>> {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(err) => {
            if is_not_found(&err) {
                warn!(path = %path.display(), "Known-words file missing; continuing with an empty set");
                return Ok(HashSet::new());
            }
            return Err(err).with_context(|| format!("Failed to open {}", path.display()));
        }
    };

    let term_column = reader
        .headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?
        .iter()
        .position(|name| name.trim().eq_ignore_ascii_case("term"))
        .unwrap_or(0);

    let mut words = HashSet::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Malformed row in {}", path.display()))?;
        if let Some(term) = record.get(term_column) {
            let term = term.trim().to_lowercase();
            if !term.is_empty() {
                words.insert(term);
            }
        }
    }
    info!(path = %path.display(), count = words.len(), "Loaded known words");
    Ok(words)
}

/// Load the stopword list (plain text, one word per line) into a lowercase set.
pub fn load_stopwords(path: &Path) -> Result<HashSet<String>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Stopword file missing; continuing with an empty set");
            return Ok(HashSet::new());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let words: HashSet<String> = contents
        .lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect();
    info!(path = %path.display(), count = words.len(), "Loaded stopwords");
    Ok(words)
}

fn is_not_found(err: &csv::Error) -> bool {
    matches!(err.kind(), csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound)
}
