//! Configuration loading.
//!
//! All tunable settings live in `conf/config.toml`. Missing or invalid
//! entries fall back to defaults so every subcommand can run without a
//! config file; the DeepL key can always be supplied through the
//! `DEEPL_API_KEY` environment variable instead of being written to disk.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const DEEPL_KEY_ENV: &str = "DEEPL_API_KEY";

/// Application configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
    /// AnkiConnect endpoint used by `known-words`.
    #[serde(default = "default_anki_connect_url")]
    pub anki_connect_url: String,
    /// DeepL endpoint used by `translate`.
    #[serde(default = "default_deepl_api_url")]
    pub deepl_api_url: String,
    /// DeepL auth key; prefer the DEEPL_API_KEY environment variable.
    #[serde(default)]
    pub deepl_api_key: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// Sentences per translation request; batches run strictly in order.
    #[serde(default = "default_translate_batch_size")]
    pub translate_batch_size: usize,
    /// Abbreviations (with trailing period) protected from sentence splits,
    /// on top of the built-in title list.
    #[serde(default)]
    pub extra_abbreviations: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: default_log_level(),
            anki_connect_url: default_anki_connect_url(),
            deepl_api_url: default_deepl_api_url(),
            deepl_api_key: String::new(),
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            translate_batch_size: default_translate_batch_size(),
            extra_abbreviations: Vec::new(),
        }
    }
}

/// Load configuration from the given path, falling back to defaults on
/// error, then apply environment overrides.
pub fn load_config(path: &Path) -> AppConfig {
    let mut config = read_config(path);
    if let Ok(key) = env::var(DEEPL_KEY_ENV) {
        if !key.trim().is_empty() {
            debug!("Using DeepL key from {DEEPL_KEY_ENV}");
            config.deepl_api_key = key;
        }
    }
    config
}

fn read_config(path: &Path) -> AppConfig {
    let contents = match fs::read_to_string(path) {
        Ok(data) => {
            info!(path = %path.display(), "Loaded base config");
            data
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                "Falling back to default config: {err}"
            );
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&contents) {
        Ok(cfg) => {
            debug!("Parsed configuration from disk");
            cfg
        }
        Err(err) => {
            warn!(path = %path.display(), "Invalid config TOML: {err}");
            AppConfig::default()
        }
    }
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_anki_connect_url() -> String {
    "http://localhost:8765".to_string()
}

fn default_deepl_api_url() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

fn default_source_lang() -> String {
    "ES".to_string()
}

fn default_target_lang() -> String {
    "ZH".to_string()
}

fn default_translate_batch_size() -> usize {
    50
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = read_config(Path::new("no/such/config.toml"));
        assert_eq!(config.translate_batch_size, 50);
        assert_eq!(config.source_lang, "ES");
        assert_eq!(config.anki_connect_url, "http://localhost:8765");
    }

    #[test]
    fn partial_config_keeps_defaults_for_missing_fields() {
        let config: AppConfig =
            toml::from_str("target_lang = \"EN\"\ntranslate_batch_size = 10\n")
                .expect("parse partial config");
        assert_eq!(config.target_lang, "EN");
        assert_eq!(config.translate_batch_size, 10);
        assert_eq!(config.source_lang, "ES");
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn invalid_toml_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        use std::io::Write;
        write!(file, "not = [valid").expect("write temp file");
        let config = read_config(file.path());
        assert_eq!(config.target_lang, "ZH");
    }
}
