//! Vocabulary-extraction utilities for language learners.
//!
//! Every pipeline here is the same linear pass over a book: load the EPUB
//! text, segment it into sentences, tokenize, filter out vocabulary the
//! learner already knows, and write flashcard-ready CSV. The one piece with
//! real logic is [`selector`], which picks a minimal set of example sentences
//! covering the unfamiliar words.

pub mod anki;
pub mod collector;
pub mod commands;
pub mod config;
pub mod deepl;
pub mod epub_loader;
pub mod highlight;
pub mod progress;
pub mod segmenter;
pub mod selector;
pub mod tokenizer;
pub mod vocab;
