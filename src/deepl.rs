//! DeepL batch translation client.
//!
//! The translation service is an opaque order-preserving batch function:
//! N source strings in, N translated strings out. Requests are form-encoded
//! with one `text` field per sentence; batches are dispatched strictly
//! sequentially by the caller. Behind the [`Translator`] trait so pipelines
//! can be exercised without network access.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::AppConfig;

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

/// Order-preserving batch translation.
pub trait Translator {
    fn translate_batch(&self, sentences: &[String]) -> Result<Vec<String>>;
}

/// Blocking client for the DeepL HTTP API.
pub struct DeepLClient {
    url: String,
    auth_key: String,
    source_lang: String,
    target_lang: String,
    http: reqwest::blocking::Client,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

impl DeepLClient {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        if config.deepl_api_key.trim().is_empty() {
            bail!("No DeepL API key configured; set deepl_api_key or DEEPL_API_KEY");
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("Failed to build HTTP client for DeepL")?;
        Ok(Self {
            url: config.deepl_api_url.clone(),
            auth_key: config.deepl_api_key.clone(),
            source_lang: config.source_lang.clone(),
            target_lang: config.target_lang.clone(),
            http,
        })
    }
}

impl Translator for DeepLClient {
    fn translate_batch(&self, sentences: &[String]) -> Result<Vec<String>> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }
        debug!(batch = sentences.len(), "Sending translation batch");

        let mut form: Vec<(&str, &str)> = vec![
            ("auth_key", self.auth_key.as_str()),
            ("source_lang", self.source_lang.as_str()),
            ("target_lang", self.target_lang.as_str()),
        ];
        for sentence in sentences {
            form.push(("text", sentence.as_str()));
        }

        let response = self
            .http
            .post(&self.url)
            .form(&form)
            .send()
            .context("DeepL request failed")?
            .error_for_status()
            .context("DeepL rejected the translation request")?;

        let body: TranslateResponse = response
            .json()
            .context("Invalid DeepL response body")?;
        if body.translations.len() != sentences.len() {
            bail!(
                "DeepL returned {} translations for {} sentences",
                body.translations.len(),
                sentences.len()
            );
        }
        Ok(body
            .translations
            .into_iter()
            .map(|translation| translation.text)
            .collect())
    }
}
