//! AnkiConnect client.
//!
//! The flashcard service is an opaque key-value fetch over local HTTP:
//! `findNotes` with an empty query lists every note id, `notesInfo` returns
//! the field contents per note. Word extraction from those fields lives
//! behind [`NoteSource`] so it can be tested without a running Anki.
//!
//! Any non-2xx response or protocol-level error aborts the run; a partial
//! known-words export would silently poison later filtering passes.

use anyhow::{Context, Result, anyhow, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info};

static RE_ASCII_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]+").unwrap());

const ANKI_CONNECT_VERSION: u8 = 6;
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Access to note field contents, however they are stored.
pub trait NoteSource {
    fn note_ids(&self) -> Result<Vec<u64>>;
    /// Field values for each requested note, one inner vec per note.
    fn note_fields(&self, ids: &[u64]) -> Result<Vec<Vec<String>>>;
}

/// Blocking client for a local AnkiConnect endpoint.
pub struct AnkiConnectClient {
    url: String,
    http: reqwest::blocking::Client,
}

#[derive(Serialize)]
struct RpcRequest<'a, P: Serialize> {
    action: &'a str,
    version: u8,
    params: P,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct NoteInfo {
    fields: BTreeMap<String, NoteField>,
}

#[derive(Deserialize)]
struct NoteField {
    value: String,
}

impl AnkiConnectClient {
    pub fn new(url: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client for AnkiConnect")?;
        Ok(Self {
            url: url.to_string(),
            http,
        })
    }

    fn call<P: Serialize, T: DeserializeOwned>(&self, action: &str, params: P) -> Result<T> {
        debug!(action, url = %self.url, "Calling AnkiConnect");
        let response = self
            .http
            .post(&self.url)
            .json(&RpcRequest {
                action,
                version: ANKI_CONNECT_VERSION,
                params,
            })
            .send()
            .with_context(|| format!("AnkiConnect request {action} failed"))?
            .error_for_status()
            .with_context(|| format!("AnkiConnect rejected {action}"))?;

        let body: RpcResponse<T> = response
            .json()
            .with_context(|| format!("Invalid AnkiConnect response for {action}"))?;
        if let Some(err) = body.error {
            bail!("AnkiConnect error for {action}: {err}");
        }
        body.result
            .ok_or_else(|| anyhow!("AnkiConnect returned no result for {action}"))
    }
}

impl NoteSource for AnkiConnectClient {
    fn note_ids(&self) -> Result<Vec<u64>> {
        self.call("findNotes", serde_json::json!({ "query": "" }))
    }

    fn note_fields(&self, ids: &[u64]) -> Result<Vec<Vec<String>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let notes: Vec<NoteInfo> = self.call("notesInfo", serde_json::json!({ "notes": ids }))?;
        Ok(notes
            .into_iter()
            .map(|note| note.fields.into_values().map(|field| field.value).collect())
            .collect())
    }
}

/// Pull every note from `source` and extract the deduplicated, lowercased
/// set of ASCII words across all field values. `BTreeSet` keeps the export
/// sorted.
pub fn collect_known_words(source: &dyn NoteSource) -> Result<BTreeSet<String>> {
    let ids = source.note_ids()?;
    info!(notes = ids.len(), "Fetched note ids");

    let mut words = BTreeSet::new();
    for fields in source.note_fields(&ids)? {
        for value in fields {
            for word in RE_ASCII_WORD.find_iter(&value) {
                words.insert(word.as_str().to_lowercase());
            }
        }
    }
    info!(words = words.len(), "Extracted known words from notes");
    Ok(words)
}
