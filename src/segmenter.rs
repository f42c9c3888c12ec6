//! Punctuation-based sentence segmentation.
//!
//! Splits on `.`, `!` or `?` followed by whitespace, with a fixed list of
//! protected abbreviations (titles) that never end a sentence. Long dashes
//! used as dialogue markers are treated as additional boundaries so each
//! speaker turn becomes its own fragment.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static RE_LEADING_DASHES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\-—–~\s]+").unwrap());
static RE_ANGLE_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[<>]+").unwrap());
static RE_EDGE_QUOTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[“"'‘]+|[”"'’]+$"#).unwrap());

/// Titles that carry a trailing period without ending the sentence.
const PROTECTED_ABBREVIATIONS: &[&str] = &[
    "sr.", "sra.", "srta.", "dr.", "dra.", "ud.", "uds.", "mr.", "mrs.", "ms.", "st.",
];

#[derive(Debug, Clone)]
pub struct Segmenter {
    abbreviations: HashSet<String>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Segmenter {
    /// Build a segmenter with the fixed abbreviation list plus any extras
    /// from configuration (compared lowercase, trailing period included).
    pub fn new(extra_abbreviations: &[String]) -> Self {
        let mut abbreviations: HashSet<String> = PROTECTED_ABBREVIATIONS
            .iter()
            .map(|abbr| (*abbr).to_string())
            .collect();
        for abbr in extra_abbreviations {
            let lower = abbr.trim().to_lowercase();
            if !lower.is_empty() {
                abbreviations.insert(lower);
            }
        }
        Self { abbreviations }
    }

    /// Split `text` into cleaned sentence fragments, in order.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let mut raw = Vec::new();
        let mut current = String::new();
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            current.push(ch);
            if matches!(ch, '.' | '!' | '?')
                && chars.peek().is_none_or(|next| next.is_whitespace())
            {
                if ch == '.' && self.ends_with_abbreviation(&current) {
                    continue;
                }
                raw.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            raw.push(current);
        }

        let mut sentences = Vec::new();
        for fragment in &raw {
            for turn in fragment.split(['—', '–']) {
                if let Some(clean) = clean_fragment(turn) {
                    sentences.push(clean);
                }
            }
        }
        sentences
    }

    fn ends_with_abbreviation(&self, current: &str) -> bool {
        current
            .trim_end()
            .rsplit(char::is_whitespace)
            .next()
            .is_some_and(|word| self.abbreviations.contains(&word.to_lowercase()))
    }
}

/// Normalize one fragment: newlines become spaces, runs of whitespace
/// collapse, leading dashes and all angle brackets go away, and edge quotes
/// are stripped. Returns `None` when nothing printable remains.
fn clean_fragment(fragment: &str) -> Option<String> {
    let replaced = fragment.replace(['\n', '\r'], " ");
    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let no_dashes = RE_LEADING_DASHES.replace(&collapsed, "");
    let no_angles = RE_ANGLE_BRACKETS.replace_all(&no_dashes, "");
    let unquoted = RE_EDGE_QUOTES.replace_all(&no_angles, "");
    let trimmed = unquoted.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
