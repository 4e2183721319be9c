use std::collections::HashSet;

use pib_core::domain::DsmEntry;
use pib_core::profiles::CriteriaProfile;

use super::synonym_expansions;
use crate::retrieve::scoring::{sort_ranked, Scored};
use crate::retrieve::token_set;

const TITLE_TOKEN_WEIGHT: usize = 3;
const TITLE_SUBSTRING_WEIGHT: usize = 5;
const KEYWORD_WEIGHT: usize = 1;
const TITLE_TERM_WEIGHT: usize = 2;

/// Query tokens plus the tokenized synonyms of every clinical term the query mentions.
pub fn expand_query(query: &str, profile: &CriteriaProfile) -> HashSet<String> {
    let mut tokens = token_set(query);
    tokens.extend(synonym_expansions(&query.to_lowercase(), profile));
    tokens
}

/// Relevance of one entry to an expanded query.
pub fn score_dsm_entry(
    query_lower: &str,
    query_tokens: &HashSet<String>,
    entry: &DsmEntry,
    profile: &CriteriaProfile,
) -> usize {
    let title_lower = entry.title.to_lowercase();

    let title_overlap = token_set(&entry.title)
        .iter()
        .filter(|t| query_tokens.contains(*t))
        .count();
    let title_substrings = query_tokens
        .iter()
        .filter(|qt| title_lower.contains(qt.as_str()))
        .count();
    let keyword_overlap = entry
        .keywords
        .iter()
        .filter(|k| query_tokens.contains(*k))
        .count();
    let title_terms = profile
        .title_bonus_terms
        .iter()
        .filter(|term| {
            let term = term.trim().to_lowercase();
            let prefix: String = term.chars().take(4).collect();
            !term.is_empty()
                && title_lower.contains(term.as_str())
                && query_lower.contains(prefix.as_str())
        })
        .count();

    TITLE_TOKEN_WEIGHT * title_overlap
        + TITLE_SUBSTRING_WEIGHT * title_substrings
        + KEYWORD_WEIGHT * keyword_overlap
        + TITLE_TERM_WEIGHT * title_terms
}

/// Rank criteria entries against a clinical query.
///
/// Entries are ordered by descending score with ties in input order; zero scores are
/// dropped. When the expanded query has no tokens the first `limit` entries are returned.
pub fn rank_dsm_entries<'a>(
    query: &str,
    entries: &'a [DsmEntry],
    limit: usize,
    profile: &CriteriaProfile,
) -> Vec<&'a DsmEntry> {
    let query_tokens = expand_query(query, profile);
    if query_tokens.is_empty() {
        return entries.iter().take(limit).collect();
    }

    let query_lower = query.to_lowercase();
    let mut scored: Vec<Scored<'a, DsmEntry>> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| Scored {
            index,
            score: score_dsm_entry(&query_lower, &query_tokens, entry, profile) as f64,
            item: entry,
        })
        .collect();
    sort_ranked(&mut scored);

    let out: Vec<&DsmEntry> = scored
        .into_iter()
        .take_while(|s| s.score > 0.0)
        .take(limit)
        .map(|s| s.item)
        .collect();

    tracing::debug!(
        query_tokens = query_tokens.len(),
        entries = entries.len(),
        selected = out.len(),
        "ranked criteria entries"
    );
    out
}
