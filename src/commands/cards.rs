//! `cards`: cloze flashcards with dictionary translations.
//!
//! Counts every word (no known/stopword filtering here), pairs each with its
//! first-seen sentence, wraps the word in an Anki cloze marker, and looks
//! the translation up in a local Spanish-to-English dictionary CSV. Unlike
//! the exclusion sets, a missing dictionary is fatal: every card would come
//! out blank.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::collector::collect_word_stats;
use crate::config::AppConfig;
use crate::epub_loader::load_chapters;
use crate::highlight::{MarkStyle, mark_first};
use crate::progress::{SharedProgress, start_spinner};
use crate::segmenter::Segmenter;
use crate::tokenizer::TokenPattern;

#[derive(Serialize)]
struct CardRow<'a> {
    word: &'a str,
    count: u64,
    example_sentence: &'a str,
    translation: &'a str,
}

pub fn run(
    config: &AppConfig,
    book: &Path,
    dictionary: &Path,
    output: &Path,
    pattern: TokenPattern,
) -> Result<()> {
    let translations = load_translation_dict(dictionary)?;

    let progress = SharedProgress::default();
    let spinner = start_spinner("Extracting", progress.clone());

    let chapters = load_chapters(book)?;
    let segmenter = Segmenter::new(&config.extra_abbreviations);
    let sentences = segmenter.segment(&chapters.join(" "));
    let stats = collect_word_stats(&sentences, pattern, None, &progress);
    drop(spinner);

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    for (word, count) in stats.by_descending_count() {
        let example = stats
            .candidates
            .get(word)
            .map(String::as_str)
            .unwrap_or_default();
        let example = mark_first(example, word, MarkStyle::Cloze);
        let translation = translations.get(word).map(String::as_str).unwrap_or("");
        writer.serialize(CardRow {
            word,
            count,
            example_sentence: &example,
            translation,
        })?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        words = stats.counts.len(),
        output = %output.display(),
        "Wrote cloze cards"
    );
    Ok(())
}

/// Local dictionary CSV with `spanish` and `english` columns.
fn load_translation_dict(path: &Path) -> Result<HashMap<String, String>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open dictionary {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?;
    let spanish = column(headers, "spanish", path)?;
    let english = column(headers, "english", path)?;

    let mut dict = HashMap::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        if let (Some(from), Some(to)) = (record.get(spanish), record.get(english)) {
            dict.insert(from.trim().to_string(), to.trim().to_string());
        }
    }
    info!(path = %path.display(), entries = dict.len(), "Loaded translation dictionary");
    Ok(dict)
}

fn column(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("{} has no '{name}' column", path.display()))
}
