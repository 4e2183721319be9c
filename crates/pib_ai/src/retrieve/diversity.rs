use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use pib_core::domain::Chunk;

use super::scoring::{rank_order, sort_ranked, Scored};

/// Two-phase selection: the best chunk of every source first, then the global fill.
///
/// Phase 1 takes each source's top chunk (ties keep input order) when it scored above
/// zero, or unconditionally with `include_unmatched_sources`, ordered by score. Phase 2
/// fills remaining slots by global score and never admits a score of zero or below.
pub(crate) fn select_diverse<'a>(
    mut scored: Vec<Scored<'a, Chunk>>,
    limit: usize,
    include_unmatched_sources: bool,
) -> Vec<&'a Chunk> {
    if limit == 0 || scored.is_empty() {
        return Vec::new();
    }

    let mut best_by_source: HashMap<&str, Scored<'a, Chunk>> = HashMap::new();
    for candidate in &scored {
        match best_by_source.entry(candidate.item.source_id.as_str()) {
            Entry::Occupied(mut best) => {
                if rank_order(candidate, best.get()).is_lt() {
                    best.insert(*candidate);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(*candidate);
            }
        }
    }
    let source_count = best_by_source.len();

    let mut pool: Vec<Scored<'a, Chunk>> = best_by_source
        .into_values()
        .filter(|c| include_unmatched_sources || c.score > 0.0)
        .collect();
    sort_ranked(&mut pool);

    let mut used: HashSet<usize> = HashSet::new();
    let mut out: Vec<&'a Chunk> = Vec::with_capacity(limit.min(scored.len()));
    for candidate in pool.iter().take(limit) {
        used.insert(candidate.index);
        out.push(candidate.item);
    }
    let per_source = out.len();

    if out.len() < limit {
        sort_ranked(&mut scored);
        for candidate in &scored {
            if out.len() >= limit || candidate.score <= 0.0 {
                break;
            }
            if used.insert(candidate.index) {
                out.push(candidate.item);
            }
        }
    }

    tracing::debug!(
        sources = source_count,
        per_source,
        filled = out.len() - per_source,
        "diversity selection"
    );
    out
}
