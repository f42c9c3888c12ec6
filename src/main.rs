//! Entry point for the vocabulary-extraction CLI.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse the subcommand and its arguments.
//! - Load configuration from `conf/config.toml`.
//! - Dispatch to the matching pipeline in `commands`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

use lexcard::commands;
use lexcard::config::load_config;
use lexcard::tokenizer::TokenPattern;

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

#[derive(Parser, Debug)]
#[command(
    name = "lexcard",
    about = "Extract flashcard-ready vocabulary from EPUB books"
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "conf/config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Case-folded word frequency table for a whole book.
    Frequency {
        /// EPUB (or plain text) book to scan.
        book: PathBuf,
        #[arg(long, default_value = "word_frequency.csv")]
        output: PathBuf,
        #[arg(long, value_enum, default_value = "spanish")]
        pattern: TokenPattern,
    },

    /// Cloze flashcards with dictionary translations for every word.
    Cards {
        book: PathBuf,
        /// Dictionary CSV with `spanish` and `english` columns.
        #[arg(long)]
        dictionary: PathBuf,
        #[arg(long, default_value = "word_with_sentences.csv")]
        output: PathBuf,
        #[arg(long, value_enum, default_value = "spanish")]
        pattern: TokenPattern,
    },

    /// Unfamiliar words with a highlighted example sentence each.
    Unknowns {
        book: PathBuf,
        /// Known-vocabulary CSV (a `term` column, or the `known-words` export).
        #[arg(long)]
        known: PathBuf,
        /// Stopword list, one word per line.
        #[arg(long)]
        stopwords: PathBuf,
        #[arg(long, default_value = "unknown_words.csv")]
        output: PathBuf,
        #[arg(long, value_enum, default_value = "spanish")]
        pattern: TokenPattern,
    },

    /// Minimal set of example sentences covering the unfamiliar words.
    Cover {
        book: PathBuf,
        #[arg(long)]
        known: PathBuf,
        #[arg(long)]
        stopwords: PathBuf,
        #[arg(long, default_value = "sentence_cover.csv")]
        output: PathBuf,
        #[arg(long, value_enum, default_value = "spanish")]
        pattern: TokenPattern,
    },

    /// Export the studied vocabulary from Anki via AnkiConnect.
    KnownWords {
        #[arg(long, default_value = "anki_words_list.csv")]
        output: PathBuf,
    },

    /// Batch-translate the `sentence` column of a CSV.
    Translate {
        /// Input CSV; must have a `sentence` column.
        input: PathBuf,
        /// Output CSV; existing translations in it are reused.
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config);
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(level = %config.log_level, "Starting vocabulary extraction");

    match cli.command {
        Commands::Frequency {
            book,
            output,
            pattern,
        } => commands::frequency::run(&book, &output, pattern),
        Commands::Cards {
            book,
            dictionary,
            output,
            pattern,
        } => commands::cards::run(&config, &book, &dictionary, &output, pattern),
        Commands::Unknowns {
            book,
            known,
            stopwords,
            output,
            pattern,
        } => commands::unknowns::run(&config, &book, &known, &stopwords, &output, pattern),
        Commands::Cover {
            book,
            known,
            stopwords,
            output,
            pattern,
        } => commands::cover::run(&config, &book, &known, &stopwords, &output, pattern),
        Commands::KnownWords { output } => commands::known_words::run(&config, &output),
        Commands::Translate { input, output } => commands::translate::run(&config, &input, &output),
    }
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_filter(filter_layer))
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}
