//! `frequency`: case-folded word counts over the whole book.

use anyhow::{Context, Result};
use serde::Serialize;
use std::cmp::Reverse;
use std::path::Path;
use tracing::info;

use crate::collector::count_case_folded;
use crate::epub_loader::load_chapters;
use crate::tokenizer::TokenPattern;

#[derive(Serialize)]
struct FrequencyRow<'a> {
    word: &'a str,
    count: u64,
}

pub fn run(book: &Path, output: &Path, pattern: TokenPattern) -> Result<()> {
    let chapters = load_chapters(book)?;
    let counts = count_case_folded(chapters.iter().map(String::as_str), pattern);

    let mut rows: Vec<(&str, u64)> = counts
        .iter()
        .map(|(word, count)| (word.as_str(), *count))
        .collect();
    rows.sort_by_key(|&(_, count)| Reverse(count));

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    for (word, count) in rows {
        writer.serialize(FrequencyRow { word, count })?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        words = counts.len(),
        output = %output.display(),
        "Wrote word frequency table"
    );
    Ok(())
}
