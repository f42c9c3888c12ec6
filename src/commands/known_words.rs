//! `known-words`: export the learner's studied vocabulary from Anki.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::anki::{AnkiConnectClient, collect_known_words};
use crate::config::AppConfig;

pub fn run(config: &AppConfig, output: &Path) -> Result<()> {
    let client = AnkiConnectClient::new(&config.anki_connect_url)?;
    let words = collect_known_words(&client)?;

    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    writer.write_record(["Word"])?;
    for word in &words {
        writer.write_record([word.as_str()])?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        words = words.len(),
        output = %output.display(),
        "Exported known-word list"
    );
    Ok(())
}
