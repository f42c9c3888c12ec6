//! Cloze and highlight marking of example sentences.

use regex::Regex;
use tracing::warn;

/// How the target word is marked inside its example sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkStyle {
    /// Anki cloze deletion: `{{c1::word}}`.
    Cloze,
    /// Inline bold tag: `<b>word</b>`.
    Bold,
}

impl MarkStyle {
    fn replacement(self) -> &'static str {
        match self {
            MarkStyle::Cloze => "{{c1::$0}}",
            MarkStyle::Bold => "<b>$0</b>",
        }
    }
}

/// Wrap the first whole-word occurrence of `word` in `sentence`. The match
/// is case-sensitive and word-boundary anchored; later occurrences and
/// non-matches leave the sentence unchanged.
pub fn mark_first(sentence: &str, word: &str, style: MarkStyle) -> String {
    let pattern = format!(r"\b{}\b", regex::escape(word));
    match Regex::new(&pattern) {
        Ok(re) => re.replace(sentence, style.replacement()).into_owned(),
        Err(err) => {
            // Escaped literals always compile; keep the sentence if not.
            warn!(word, "Failed to build highlight pattern: {err}");
            sentence.to_string()
        }
    }
}
