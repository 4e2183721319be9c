use std::cmp::Ordering;
use std::collections::HashSet;

use pib_core::domain::Chunk;

use super::tokenize::tokenize;

/// An input item with its score and its position in the caller's slice.
///
/// The position is the explicit tie-breaker: equal scores keep input order regardless of
/// which sort routine is used.
pub(crate) struct Scored<'a, T> {
    pub index: usize,
    pub score: f64,
    pub item: &'a T,
}

impl<T> Clone for Scored<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Scored<'_, T> {}

/// Descending score, then ascending input position.
pub(crate) fn rank_order<T>(a: &Scored<'_, T>, b: &Scored<'_, T>) -> Ordering {
    b.score.total_cmp(&a.score).then(a.index.cmp(&b.index))
}

pub(crate) fn sort_ranked<T>(items: &mut [Scored<'_, T>]) {
    items.sort_unstable_by(rank_order);
}

/// Number of tokens in `text` (counted per occurrence) that belong to the query set.
pub(crate) fn lexical_score(query_tokens: &HashSet<String>, text: &str) -> usize {
    tokenize(text)
        .iter()
        .filter(|t| query_tokens.contains(t.as_str()))
        .count()
}

pub(crate) fn score_chunks<'a>(
    query_tokens: &HashSet<String>,
    chunks: &'a [Chunk],
) -> Vec<Scored<'a, Chunk>> {
    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| Scored {
            index,
            score: lexical_score(query_tokens, &chunk.text) as f64,
            item: chunk,
        })
        .collect()
}
