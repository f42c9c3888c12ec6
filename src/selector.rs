//! Greedy example-sentence assignment.
//!
//! Each token has exactly one candidate sentence (its first occurrence), so
//! "minimizing" the sentence set reduces to deciding which token wins when
//! two tokens share the same first-seen sentence. Tokens are visited rarest
//! first: a rare word's only appearance in the book is usually its candidate
//! sentence, so it gets first claim, while a frequent word losing its
//! candidate is acceptable loss. Ties keep the frequency table's insertion
//! order (stable sort on the count alone).
//!
//! The pass is pure and total: any well-formed input, including empty maps,
//! produces a deterministic result without error.

use indexmap::{IndexMap, IndexSet};

use crate::collector::WordStats;

/// Result of the assignment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// One entry per input token, in the order tokens were visited
    /// (ascending count). `None` means the token got no example.
    pub assignments: IndexMap<String, Option<String>>,
    /// Every sentence claimed by some token, in claim order. Grows
    /// monotonically during the pass and is never pruned.
    pub used_sentences: IndexSet<String>,
}

impl Selection {
    /// Number of tokens that ended up with an example sentence.
    pub fn coverage(&self) -> usize {
        self.assignments
            .values()
            .filter(|sentence| sentence.is_some())
            .count()
    }

    /// Inverse view: each used sentence with the tokens assigned to it, in
    /// claim order. Every returned sentence has at least one token.
    pub fn sentence_groups(&self) -> Vec<(&str, Vec<&str>)> {
        self.used_sentences
            .iter()
            .map(|sentence| {
                let words: Vec<&str> = self
                    .assignments
                    .iter()
                    .filter(|(_, assigned)| assigned.as_deref() == Some(sentence.as_str()))
                    .map(|(word, _)| word.as_str())
                    .collect();
                (sentence.as_str(), words)
            })
            .collect()
    }
}

/// Assign at most one example sentence per token, rarest tokens first.
///
/// A token takes its candidate iff the candidate is non-empty and no rarer
/// token claimed it already; otherwise the token is left without an example.
pub fn assign_examples(stats: &WordStats) -> Selection {
    let mut order: Vec<(&String, u64)> = stats
        .counts
        .iter()
        .map(|(word, count)| (word, *count))
        .collect();
    // Stable: equal counts stay in first-seen order.
    order.sort_by_key(|&(_, count)| count);

    let mut selection = Selection::default();
    for (word, _) in order {
        let candidate = stats
            .candidates
            .get(word)
            .map(String::as_str)
            .filter(|sentence| !sentence.is_empty());

        let assigned = match candidate {
            Some(sentence) if !selection.used_sentences.contains(sentence) => {
                selection.used_sentences.insert(sentence.to_string());
                Some(sentence.to_string())
            }
            _ => None,
        };
        selection.assignments.insert(word.clone(), assigned);
    }
    selection
}
