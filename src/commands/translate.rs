//! `translate`: append machine translations to a sentence CSV.
//!
//! Reads the input rows, reuses any translations already present in the
//! output file from an earlier run, sends the remaining sentences to the
//! translation service in strictly sequential batches, and rewrites the
//! output with every input row in its original order plus a `translation`
//! column. Everything is quoted so sentences with commas survive Excel.

use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexSet;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::deepl::{DeepLClient, Translator};
use crate::progress::{StopToken, interrupt_token};

const TRANSLATION_COLUMN: &str = "translation";
const SENTENCE_COLUMN: &str = "sentence";

pub fn run(config: &AppConfig, input: &Path, output: &Path) -> Result<()> {
    let (headers, rows) = read_rows(input)?;
    let sentence_idx = headers
        .iter()
        .position(|header| header == SENTENCE_COLUMN)
        .ok_or_else(|| anyhow!("{} has no '{SENTENCE_COLUMN}' column", input.display()))?;

    let mut translations = load_existing_translations(output)?;
    let pending = pending_sentences(&rows, sentence_idx, &translations);
    info!(
        rows = rows.len(),
        already_translated = translations.len(),
        pending = pending.len(),
        "Translation work remaining"
    );

    if !pending.is_empty() {
        let translator = DeepLClient::from_config(config)?;
        translate_pending(
            &translator,
            &pending,
            config.translate_batch_size,
            &mut translations,
            &interrupt_token(),
        )?;
    }

    write_output(output, &headers, &rows, sentence_idx, &translations)?;
    info!(output = %output.display(), "Wrote translated rows");
    Ok(())
}

fn read_rows(path: &Path) -> Result<(csv::StringRecord, Vec<csv::StringRecord>)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?
        .clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record.with_context(|| format!("Malformed row in {}", path.display()))?);
    }
    Ok((headers, rows))
}

/// Translations recovered from a previous partial run, if the output file
/// exists and carries both columns.
fn load_existing_translations(path: &Path) -> Result<HashMap<String, String>> {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(err) => {
            if matches!(err.kind(), csv::ErrorKind::Io(io) if io.kind() == ErrorKind::NotFound) {
                return Ok(HashMap::new());
            }
            return Err(err)
                .with_context(|| format!("Failed to open existing output {}", path.display()));
        }
    };

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header row of {}", path.display()))?
        .clone();
    let sentence_idx = headers.iter().position(|header| header == SENTENCE_COLUMN);
    let translation_idx = headers
        .iter()
        .position(|header| header == TRANSLATION_COLUMN);
    let (Some(sentence_idx), Some(translation_idx)) = (sentence_idx, translation_idx) else {
        warn!(path = %path.display(), "Existing output lacks expected columns; retranslating everything");
        return Ok(HashMap::new());
    };

    let mut translations = HashMap::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Malformed row in {}", path.display()))?;
        if let (Some(sentence), Some(translation)) =
            (record.get(sentence_idx), record.get(translation_idx))
        {
            if !translation.is_empty() {
                translations.insert(sentence.to_string(), translation.to_string());
            }
        }
    }
    info!(path = %path.display(), reused = translations.len(), "Reusing existing translations");
    Ok(translations)
}

/// Sentences with no usable translation yet, deduplicated, in row order.
fn pending_sentences(
    rows: &[csv::StringRecord],
    sentence_idx: usize,
    translations: &HashMap<String, String>,
) -> Vec<String> {
    let mut pending = IndexSet::new();
    for row in rows {
        if let Some(sentence) = row.get(sentence_idx) {
            let translated = translations.get(sentence).is_some_and(|t| !t.is_empty());
            if !sentence.is_empty() && !translated {
                pending.insert(sentence.to_string());
            }
        }
    }
    pending.into_iter().collect()
}

/// Dispatch batches one at a time, each waiting on the previous response.
/// Ctrl-C stops the loop at the next batch boundary.
fn translate_pending(
    translator: &dyn Translator,
    pending: &[String],
    batch_size: usize,
    translations: &mut HashMap<String, String>,
    interrupt: &StopToken,
) -> Result<()> {
    let batch_size = batch_size.max(1);
    let batches = pending.len().div_ceil(batch_size);
    let bar = ProgressBar::new(batches as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} batches")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.set_message("Translating");

    for chunk in pending.chunks(batch_size) {
        if interrupt.is_tripped() {
            bar.abandon();
            bail!("Translation interrupted before completion; output left untouched");
        }
        let translated = translator.translate_batch(chunk)?;
        for (sentence, translation) in chunk.iter().zip(translated) {
            translations.insert(sentence.clone(), translation);
        }
        bar.inc(1);
    }
    bar.finish();
    Ok(())
}

/// Rewrite every input row in original order with the translation appended.
fn write_output(
    path: &Path,
    headers: &csv::StringRecord,
    rows: &[csv::StringRecord],
    sentence_idx: usize,
    translations: &HashMap<String, String>,
) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let kept: Vec<usize> = (0..headers.len())
        .filter(|&idx| headers.get(idx) != Some(TRANSLATION_COLUMN))
        .collect();

    let mut header_row: Vec<&str> = kept
        .iter()
        .filter_map(|&idx| headers.get(idx))
        .collect();
    header_row.push(TRANSLATION_COLUMN);
    writer.write_record(&header_row)?;

    for row in rows {
        let translation = row
            .get(sentence_idx)
            .and_then(|sentence| translations.get(sentence))
            .map(String::as_str)
            .unwrap_or("");
        let mut record: Vec<&str> = kept
            .iter()
            .map(|&idx| row.get(idx).unwrap_or(""))
            .collect();
        record.push(translation);
        writer.write_record(&record)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeTranslator {
        batches: RefCell<Vec<usize>>,
    }

    impl FakeTranslator {
        fn new() -> Self {
            Self {
                batches: RefCell::new(Vec::new()),
            }
        }
    }

    impl Translator for FakeTranslator {
        fn translate_batch(&self, sentences: &[String]) -> Result<Vec<String>> {
            self.batches.borrow_mut().push(sentences.len());
            Ok(sentences.iter().map(|s| format!("T:{s}")).collect())
        }
    }

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn pending_skips_translated_and_empty_sentences() {
        let rows = vec![
            record(&["Hola.", "1"]),
            record(&["", "2"]),
            record(&["Adiós.", "3"]),
            record(&["Hola.", "4"]),
        ];
        let mut translations = HashMap::new();
        translations.insert("Adiós.".to_string(), "Bye.".to_string());

        let pending = pending_sentences(&rows, 0, &translations);
        assert_eq!(pending, vec!["Hola.".to_string()]);
    }

    #[test]
    fn empty_existing_translation_is_retried() {
        let rows = vec![record(&["Hola."])];
        let mut translations = HashMap::new();
        translations.insert("Hola.".to_string(), String::new());
        let pending = pending_sentences(&rows, 0, &translations);
        assert_eq!(pending, vec!["Hola.".to_string()]);
    }

    #[test]
    fn batches_run_sequentially_and_fill_the_map() {
        let pending: Vec<String> = (0..5).map(|i| format!("s{i}")).collect();
        let translator = FakeTranslator::new();
        let mut translations = HashMap::new();

        translate_pending(
            &translator,
            &pending,
            2,
            &mut translations,
            &StopToken::default(),
        )
        .expect("translate");

        assert_eq!(*translator.batches.borrow(), vec![2, 2, 1]);
        assert_eq!(translations.len(), 5);
        assert_eq!(translations["s3"], "T:s3");
    }

    #[test]
    fn interrupt_stops_at_a_batch_boundary() {
        let pending: Vec<String> = (0..4).map(|i| format!("s{i}")).collect();
        let translator = FakeTranslator::new();
        let mut translations = HashMap::new();
        let interrupt = StopToken::default();
        interrupt.trip();

        let result = translate_pending(&translator, &pending, 2, &mut translations, &interrupt);
        assert!(result.is_err());
        assert!(translator.batches.borrow().is_empty());
    }

    #[test]
    fn output_preserves_row_order_and_appends_translation() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("out.csv");
        let headers = record(&["sentence", "words"]);
        let rows = vec![
            record(&["Hola, mundo.", "hola"]),
            record(&["Adiós.", "adiós"]),
        ];
        let mut translations = HashMap::new();
        translations.insert("Hola, mundo.".to_string(), "Hello, world.".to_string());

        write_output(&path, &headers, &rows, 0, &translations).expect("write output");
        let written = std::fs::read_to_string(&path).expect("read output");
        assert_eq!(
            written,
            "\"sentence\",\"words\",\"translation\"\n\
             \"Hola, mundo.\",\"hola\",\"Hello, world.\"\n\
             \"Adiós.\",\"adiós\",\"\"\n"
        );
    }

    #[test]
    fn rewriting_drops_a_stale_translation_column() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("out.csv");
        let headers = record(&["sentence", "translation"]);
        let rows = vec![record(&["Hola.", "old"])];
        let mut translations = HashMap::new();
        translations.insert("Hola.".to_string(), "Hello.".to_string());

        write_output(&path, &headers, &rows, 0, &translations).expect("write output");
        let written = std::fs::read_to_string(&path).expect("read output");
        assert_eq!(
            written,
            "\"sentence\",\"translation\"\n\"Hola.\",\"Hello.\"\n"
        );
    }
}
