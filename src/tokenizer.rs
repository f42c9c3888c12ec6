//! Word extraction from cleaned text.

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_SPANISH_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-ZáéíóúüñÁÉÍÓÚÜÑ]+").unwrap());
static RE_UNICODE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{L}+").unwrap());

/// Which letter alphabet counts as "word characters".
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenPattern {
    /// ASCII letters plus the Spanish accented set.
    Spanish,
    /// Any Unicode letter.
    Unicode,
}

impl TokenPattern {
    fn regex(self) -> &'static Regex {
        match self {
            TokenPattern::Spanish => &RE_SPANISH_WORD,
            TokenPattern::Unicode => &RE_UNICODE_WORD,
        }
    }

    /// Maximal letter runs, left to right, duplicates included, case preserved.
    pub fn tokens<'t>(self, text: &'t str) -> impl Iterator<Item = &'t str> {
        self.regex().find_iter(text).map(|m| m.as_str())
    }
}
