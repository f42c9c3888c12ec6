//! `cover`: minimal example-sentence set over the unfamiliar vocabulary.
//!
//! Filters out known words and stopwords, then runs the greedy selector so
//! each remaining word claims at most one example sentence. The output has
//! one row per claimed sentence with the words it covers; run statistics
//! go to the log.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use crate::collector::collect_word_stats;
use crate::config::AppConfig;
use crate::epub_loader::load_chapters;
use crate::progress::{SharedProgress, start_spinner};
use crate::segmenter::Segmenter;
use crate::selector::assign_examples;
use crate::tokenizer::TokenPattern;
use crate::vocab::{VocabFilter, load_known_words, load_stopwords};

#[derive(Serialize)]
struct CoverRow<'a> {
    sentence: &'a str,
    words: String,
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

    let selection = assign_examples(&stats);

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    for (sentence, words) in selection.sentence_groups() {
        writer.serialize(CoverRow {
            sentence,
            words: words.join(", "),
        })?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let covered = selection.coverage();
    let kept = selection.used_sentences.len();
    let avg_words_per_sentence = if kept > 0 {
        covered as f64 / kept as f64
    } else {
        0.0
    };
    info!(
        total_words = stats.counts.len(),
        covered_words = covered,
        sentences_kept = kept,
        avg_words_per_sentence = format!("{avg_words_per_sentence:.2}"),
        output = %output.display(),
        "Wrote sentence cover"
    );
    Ok(())
}
