//! Property-based tests for the greedy example-sentence selector.
//!
//! These verify the selector's contract over arbitrary frequency tables and
//! candidate maps:
//! - One assignment entry per input token, never more, never fewer
//! - Used sentences bounded by distinct non-empty candidates and by tokens
//! - Tokens with distinct candidates always get covered
//! - Deterministic and idempotent over frozen inputs

use indexmap::IndexMap;
use proptest::prelude::*;
use std::collections::HashSet;

use lexcard::collector::WordStats;
use lexcard::selector::assign_examples;

// =============================================================================
// Test Generators
// =============================================================================

/// Arbitrary frozen collector output: unique tokens, counts, and candidate
/// sentences drawn from a small pool so sharing happens often.
fn arbitrary_stats() -> impl Strategy<Value = WordStats> {
    prop::collection::vec(
        (
            prop::string::string_regex("[a-záéíóúñ]{1,8}").unwrap(),
            1u64..200,
            prop::sample::select(vec!["", "S1", "S2", "S3", "S4", "S5"]),
        ),
        0..30,
    )
    .prop_map(|entries| {
        let mut counts = IndexMap::new();
        let mut candidates = IndexMap::new();
        for (token, count, sentence) in entries {
            if counts.contains_key(&token) {
                continue;
            }
            counts.insert(token.clone(), count);
            candidates.insert(token, sentence.to_string());
        }
        WordStats { counts, candidates }
    })
}

proptest! {
    #[test]
    fn one_assignment_entry_per_token(stats in arbitrary_stats()) {
        let selection = assign_examples(&stats);
        prop_assert_eq!(selection.assignments.len(), stats.counts.len());
        for token in stats.counts.keys() {
            prop_assert!(selection.assignments.contains_key(token));
        }
    }

    #[test]
    fn used_sentences_are_bounded(stats in arbitrary_stats()) {
        let selection = assign_examples(&stats);
        let distinct_candidates: HashSet<&String> = stats
            .candidates
            .values()
            .filter(|sentence| !sentence.is_empty())
            .collect();
        prop_assert!(selection.used_sentences.len() <= distinct_candidates.len());
        prop_assert!(selection.used_sentences.len() <= stats.counts.len());
    }

    #[test]
    fn assignments_come_from_the_candidate_map(stats in arbitrary_stats()) {
        let selection = assign_examples(&stats);
        for (token, assigned) in &selection.assignments {
            if let Some(sentence) = assigned {
                // Never another token's sentence.
                prop_assert_eq!(Some(sentence), stats.candidates.get(token));
            }
        }
    }

    #[test]
    fn each_sentence_is_claimed_at_most_once(stats in arbitrary_stats()) {
        let selection = assign_examples(&stats);
        let mut seen = HashSet::new();
        for assigned in selection.assignments.values().flatten() {
            prop_assert!(seen.insert(assigned.clone()));
            prop_assert!(selection.used_sentences.contains(assigned));
        }
        // And every used sentence belongs to at least one token.
        prop_assert_eq!(seen.len(), selection.used_sentences.len());
    }

    #[test]
    fn distinct_candidates_are_always_covered(stats in arbitrary_stats()) {
        let selection = assign_examples(&stats);
        let mut sentence_owners: std::collections::HashMap<&String, usize> =
            std::collections::HashMap::new();
        for sentence in stats.candidates.values() {
            if !sentence.is_empty() {
                *sentence_owners.entry(sentence).or_insert(0) += 1;
            }
        }
        for (token, sentence) in &stats.candidates {
            if !sentence.is_empty() && sentence_owners[sentence] == 1 {
                prop_assert!(
                    selection.assignments[token].is_some(),
                    "token {} with unshared candidate was left uncovered",
                    token
                );
            }
        }
    }

    #[test]
    fn selector_is_idempotent(stats in arbitrary_stats()) {
        let first = assign_examples(&stats);
        let second = assign_examples(&stats);
        prop_assert_eq!(first, second);
    }
}
