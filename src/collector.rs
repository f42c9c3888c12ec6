//! Frequency counting and first-seen candidate sentences.
//!
//! One pass over the cleaned sentences builds both tables at once. The maps
//! are insertion-ordered on purpose: the selector's tie-break for equal
//! counts is "first token seen wins", which is only meaningful if the
//! frequency table remembers the order tokens first appeared in.
//!
//! Counting keys keep their original case while exclusion checks lowercase
//! the token, so "Word" and "word" count separately even though either is
//! excluded whenever one casing is known. That asymmetry is inherited
//! behavior and pinned down by a test below.

use indexmap::IndexMap;

use crate::progress::SharedProgress;
use crate::tokenizer::TokenPattern;
use crate::vocab::VocabFilter;

/// Frozen output of the collection pass; read-only once built.
#[derive(Debug, Clone, Default)]
pub struct WordStats {
    /// Token (original case) to occurrence count, in first-seen order.
    pub counts: IndexMap<String, u64>,
    /// Token to the first sentence it appeared in; never overwritten.
    pub candidates: IndexMap<String, String>,
}

impl WordStats {
    /// Rows sorted by descending count, ties in first-seen order
    /// (the `Counter.most_common` ordering).
    pub fn by_descending_count(&self) -> Vec<(&str, u64)> {
        let mut rows: Vec<(&str, u64)> = self
            .counts
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
            .collect();
        rows.sort_by_key(|&(_, count)| std::cmp::Reverse(count));
        rows
    }
}

/// Scan `sentences`, counting relevant tokens and recording each token's
/// first sentence. `filter` is `None` for pipelines that keep every word.
/// Progress is reported as a percentage of sentences scanned.
pub fn collect_word_stats(
    sentences: &[String],
    pattern: TokenPattern,
    filter: Option<&VocabFilter>,
    progress: &SharedProgress,
) -> WordStats {
    let mut stats = WordStats::default();
    let total = sentences.len();

    for (idx, sentence) in sentences.iter().enumerate() {
        for token in pattern.tokens(sentence) {
            if filter.is_some_and(|f| !f.is_relevant(token)) {
                continue;
            }
            *stats.counts.entry(token.to_string()).or_insert(0) += 1;
            stats
                .candidates
                .entry(token.to_string())
                .or_insert_with(|| sentence.clone());
        }
        if total > 0 {
            progress.set_percent((idx + 1) as f64 / total as f64 * 100.0);
        }
    }
    stats
}

/// Case-folded frequency count over raw text parts, no sentence tracking.
/// Used by the plain frequency listing, which lowercases before counting.
pub fn count_case_folded<'t>(
    parts: impl Iterator<Item = &'t str>,
    pattern: TokenPattern,
) -> IndexMap<String, u64> {
    let mut counts = IndexMap::new();
    for part in parts {
        for token in pattern.tokens(part) {
            *counts.entry(token.to_lowercase()).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sentences(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn counts_and_candidates_share_one_pass() {
        let input = sentences(&["El perro corre.", "El gato duerme.", "perro y gato."]);
        let progress = SharedProgress::default();
        let stats = collect_word_stats(&input, TokenPattern::Spanish, None, &progress);

        assert_eq!(stats.counts["perro"], 2);
        assert_eq!(stats.counts["gato"], 2);
        assert_eq!(stats.candidates["perro"], "El perro corre.");
        assert_eq!(stats.candidates["gato"], "El gato duerme.");
        // Every counted token has exactly one candidate.
        assert_eq!(stats.counts.len(), stats.candidates.len());
        assert!((progress.percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn candidate_is_never_overwritten() {
        let input = sentences(&["uno primero.", "uno segundo.", "uno tercero."]);
        let stats = collect_word_stats(
            &input,
            TokenPattern::Spanish,
            None,
            &SharedProgress::default(),
        );
        assert_eq!(stats.candidates["uno"], "uno primero.");
    }

    #[test]
    fn filter_excludes_tokens_by_lowercase_membership() {
        let known: HashSet<String> = ["pasó".to_string()].into_iter().collect();
        let stopwords: HashSet<String> = ["qué".to_string()].into_iter().collect();
        let filter = VocabFilter::new(known, stopwords);

        let input = sentences(&["¿Qué pasó, señor López?"]);
        let stats = collect_word_stats(
            &input,
            TokenPattern::Spanish,
            Some(&filter),
            &SharedProgress::default(),
        );

        let words: Vec<&String> = stats.counts.keys().collect();
        assert_eq!(words, vec!["señor", "López"]);
    }

    #[test]
    fn original_case_counts_separately_but_either_casing_is_excluded() {
        // Inherited case-sensitivity policy: counting keys preserve case,
        // exclusion tests fold to lowercase.
        let input = sentences(&["Perro grande.", "perro chico."]);
        let stats = collect_word_stats(
            &input,
            TokenPattern::Spanish,
            None,
            &SharedProgress::default(),
        );
        assert_eq!(stats.counts["Perro"], 1);
        assert_eq!(stats.counts["perro"], 1);

        let known: HashSet<String> = ["perro".to_string()].into_iter().collect();
        let filter = VocabFilter::new(known, HashSet::new());
        let filtered = collect_word_stats(
            &input,
            TokenPattern::Spanish,
            Some(&filter),
            &SharedProgress::default(),
        );
        assert!(!filtered.counts.contains_key("Perro"));
        assert!(!filtered.counts.contains_key("perro"));
    }

    #[test]
    fn descending_order_breaks_ties_by_first_appearance() {
        let input = sentences(&["beta alfa beta.", "alfa gama."]);
        let stats = collect_word_stats(
            &input,
            TokenPattern::Spanish,
            None,
            &SharedProgress::default(),
        );
        let order: Vec<&str> = stats
            .by_descending_count()
            .into_iter()
            .map(|(word, _)| word)
            .collect();
        assert_eq!(order, vec!["beta", "alfa", "gama"]);
    }

    #[test]
    fn case_folded_count_merges_casings() {
        let counts = count_case_folded(
            ["Perro perro PERRO gato"].into_iter(),
            TokenPattern::Spanish,
        );
        assert_eq!(counts["perro"], 3);
        assert_eq!(counts["gato"], 1);
    }

    #[test]
    fn empty_input_produces_empty_tables() {
        let stats = collect_word_stats(
            &[],
            TokenPattern::Spanish,
            None,
            &SharedProgress::default(),
        );
        assert!(stats.counts.is_empty());
        assert!(stats.candidates.is_empty());
    }
}
