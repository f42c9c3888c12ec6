//! `unknowns`: unfamiliar words with a highlighted example sentence.
//!
//! Same filtering pass as `cover`, but every word keeps its own first-seen
//! sentence (no sentence deduplication) and the word is marked with a bold
//! tag instead of a cloze deletion.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::collector::collect_word_stats;
use crate::config::AppConfig;
use crate::epub_loader::load_chapters;
use crate::highlight::{MarkStyle, mark_first};
use crate::progress::{SharedProgress, start_spinner};
use crate::segmenter::Segmenter;
use crate::tokenizer::TokenPattern;
use crate::vocab::{VocabFilter, load_known_words, load_stopwords};

#[derive(Serialize)]
struct UnknownRow<'a> {
    word: &'a str,
    count: u64,
    example_sentence: &'a str,
}

pub fn run(
    config: &AppConfig,
    book: &Path,
    known: &Path,
    stopwords: &Path,
    output: &Path,
    pattern: TokenPattern,
) -> Result<()> {
    let filter = VocabFilter::new(load_known_words(known)?, load_stopwords(stopwords)?);

    let progress = SharedProgress::default();
    let spinner = start_spinner("Scanning", progress.clone());

    let chapters = load_chapters(book)?;
    let segmenter = Segmenter::new(&config.extra_abbreviations);
    let sentences = segmenter.segment(&chapters.join(" "));
    let stats = collect_word_stats(&sentences, pattern, Some(&filter), &progress);
    drop(spinner);

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    for (word, count) in stats.by_descending_count() {
        let example = stats
            .candidates
            .get(word)
            .map(String::as_str)
            .unwrap_or_default();
        let example = mark_first(example, word, MarkStyle::Bold);
        writer.serialize(UnknownRow {
            word,
            count,
            example_sentence: &example,
        })?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        words = stats.counts.len(),
        output = %output.display(),
        "Wrote unknown-word list"
    );
    Ok(())
}
