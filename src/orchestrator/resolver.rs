//! Fuzzy repository name resolution.
//!
//! Voice transcription mangles repository names, so the catalog is matched
//! with a character-bigram Sorensen-Dice similarity. The resolver always
//! returns the best candidate with its confidence; interpreting a low score
//! is dialogue policy and belongs to the orchestrator.
use std::collections::HashMap;

use crate::forge::types::Repository;

/// Best catalog candidate for a free-text repository name.
#[derive(Debug)]
pub struct MatchResult<'a> {
    pub candidate: &'a Repository,
    /// Similarity of the free text against `candidate.name`, in [0, 1].
    pub confidence: f64,
}

/// Select the maximum-similarity repository for `free_text`.
///
/// Ties keep the first occurrence, so the catalog's
/// most-recently-updated-first order makes ties favor recency. Precondition:
/// `repositories` is non-empty (the orchestrator checks the catalog before
/// resolving).
pub fn resolve<'a>(
    free_text: &str,
    repositories: &'a [Repository],
) -> MatchResult<'a> {
    let mut candidate = &repositories[0];
    let mut confidence = similarity(free_text, &repositories[0].name);

    for repository in &repositories[1..] {
        let score = similarity(free_text, &repository.name);
        if score > confidence {
            candidate = repository;
            confidence = score;
        }
    }

    MatchResult {
        candidate,
        confidence,
    }
}

/// Character-bigram Sorensen-Dice coefficient over whitespace-stripped
/// strings. Equal strings score 1.0; strings without a full bigram score 0.0.
pub fn similarity(first: &str, second: &str) -> f64 {
    let first: Vec<char> =
        first.chars().filter(|c| !c.is_whitespace()).collect();
    let second: Vec<char> =
        second.chars().filter(|c| !c.is_whitespace()).collect();

    if first == second {
        return 1.0;
    }

    if first.len() < 2 || second.len() < 2 {
        return 0.0;
    }

    let mut bigrams: HashMap<(char, char), usize> = HashMap::new();

    for pair in first.windows(2) {
        *bigrams.entry((pair[0], pair[1])).or_insert(0) += 1;
    }

    let mut intersections = 0usize;

    for pair in second.windows(2) {
        if let Some(count) = bigrams.get_mut(&(pair[0], pair[1]))
            && *count > 0
        {
            *count -= 1;
            intersections += 1;
        }
    }

    (2.0 * intersections as f64)
        / ((first.len() - 1) + (second.len() - 1)) as f64
}
