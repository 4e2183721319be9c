use std::collections::HashSet;

use pib_core::domain::{Chunk, SourceDoc};
use pib_core::profiles::RankingProfile;
use serde::{Deserialize, Serialize};

mod diversity;
pub(crate) mod scoring;
mod tokenize;
mod weighting;

pub use tokenize::{token_set, tokenize};
pub use weighting::EvidenceWeight;

use scoring::{lexical_score, score_chunks, sort_ranked, Scored};
use weighting::EvidenceWeighting;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RankOptions {
    /// Let a source whose best chunk scored zero still take one slot in the first phase.
    pub include_unmatched_sources: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightedRankOptions {
    pub include_unmatched_sources: bool,
    /// Favor document types that carry history-of-present-illness narrative.
    #[serde(rename = "prioritizeForHPI")]
    pub prioritize_for_hpi: bool,
}

/// Score breakdown for one chunk under [`rank_evidence_weighted`].
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedScore<'a> {
    pub chunk: &'a Chunk,
    pub raw_score: usize,
    pub weight: EvidenceWeight,
    pub score: f64,
}

fn query_fallback<'a>(chunks: &'a [Chunk], limit: usize) -> Vec<&'a Chunk> {
    chunks.iter().take(limit).collect()
}

/// Rank chunks by raw term overlap with the query.
///
/// An empty query (no tokens survive [`tokenize`]) returns the first `limit` chunks
/// unchanged. Otherwise chunks are ordered by descending score, ties in input order, and
/// chunks scoring zero are dropped.
pub fn rank_evidence<'a>(query: &str, chunks: &'a [Chunk], limit: usize) -> Vec<&'a Chunk> {
    let query_tokens = token_set(query);
    if query_tokens.is_empty() {
        return query_fallback(chunks, limit);
    }

    let mut scored = score_chunks(&query_tokens, chunks);
    sort_ranked(&mut scored);
    let out: Vec<&Chunk> = scored
        .into_iter()
        .take_while(|s| s.score > 0.0)
        .take(limit)
        .map(|s| s.item)
        .collect();

    tracing::debug!(
        query_tokens = query_tokens.len(),
        candidates = chunks.len(),
        selected = out.len(),
        "ranked evidence"
    );
    out
}

/// Like [`rank_evidence`], but every source with a positive match is represented before
/// any source contributes a second chunk.
pub fn rank_evidence_diverse<'a>(
    query: &str,
    chunks: &'a [Chunk],
    limit: usize,
    opts: RankOptions,
) -> Vec<&'a Chunk> {
    let query_tokens = token_set(query);
    if query_tokens.is_empty() {
        return query_fallback(chunks, limit);
    }

    let scored = score_chunks(&query_tokens, chunks);
    diversity::select_diverse(scored, limit, opts.include_unmatched_sources)
}

/// Composite score for every chunk, in input order.
///
/// `score = raw * doc_weight + recency_boost + hpi_boost`; see [`rank_evidence_weighted`].
pub fn explain_evidence_weighted<'a>(
    query: &str,
    chunks: &'a [Chunk],
    docs: &[SourceDoc],
    opts: WeightedRankOptions,
    profile: &RankingProfile,
) -> Vec<WeightedScore<'a>> {
    weighted_scores(&token_set(query), chunks, docs, opts, profile)
}

fn weighted_scores<'a>(
    query_tokens: &HashSet<String>,
    chunks: &'a [Chunk],
    docs: &[SourceDoc],
    opts: WeightedRankOptions,
    profile: &RankingProfile,
) -> Vec<WeightedScore<'a>> {
    let weighting = EvidenceWeighting::new(chunks, docs, profile, opts.prioritize_for_hpi);

    chunks
        .iter()
        .map(|chunk| {
            let raw_score = lexical_score(query_tokens, &chunk.text);
            let weight = weighting.weight(chunk);
            WeightedScore {
                chunk,
                raw_score,
                score: weight.apply(raw_score),
                weight,
            }
        })
        .collect()
}

/// Diversity-aware ranking over a composite score.
///
/// Each chunk's term overlap is multiplied by its document weight (chunk override, else the
/// profile's weight for the chunk's or owning document's type), then a recency boost
/// (position of the chunk's episode date within the corpus date range, scaled to
/// `profile.recency_max_boost`) and, with `prioritize_for_hpi`, the profile's HPI boost are
/// added. Chunks whose `source_id` matches no document get the default weight.
///
/// Boosts apply regardless of term overlap, so a recent discharge summary can be selected
/// in the fill phase without matching the query.
pub fn rank_evidence_weighted<'a>(
    query: &str,
    chunks: &'a [Chunk],
    docs: &[SourceDoc],
    limit: usize,
    opts: WeightedRankOptions,
    profile: &RankingProfile,
) -> Vec<&'a Chunk> {
    let query_tokens = token_set(query);
    if query_tokens.is_empty() {
        return query_fallback(chunks, limit);
    }

    let weighted = weighted_scores(&query_tokens, chunks, docs, opts, profile);
    let scored: Vec<Scored<'a, Chunk>> = weighted
        .into_iter()
        .enumerate()
        .map(|(index, s)| Scored {
            index,
            score: s.score,
            item: s.chunk,
        })
        .collect();

    diversity::select_diverse(scored, limit, opts.include_unmatched_sources)
}
