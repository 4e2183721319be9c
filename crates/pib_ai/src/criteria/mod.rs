use std::sync::Arc;

use pib_core::cache::{content_hash, IndexCache};
use pib_core::domain::DsmEntry;
use pib_core::profiles::CriteriaProfile;

mod extract;
mod rank;

pub use extract::build_dsm_index;
pub use rank::{expand_query, rank_dsm_entries, score_dsm_entry};

use crate::retrieve::tokenize;

pub type DsmIndexCache = IndexCache<Vec<DsmEntry>>;

/// Base terms and tokenized synonyms for every synonym group whose term or synonyms occur
/// as substrings of `lower_text`.
pub(crate) fn synonym_expansions(lower_text: &str, profile: &CriteriaProfile) -> Vec<String> {
    let mut out = Vec::new();
    for group in profile.synonyms.iter().filter(|g| g.triggered_by(lower_text)) {
        out.extend(group.normalized_term());
        for synonym in &group.synonyms {
            out.extend(tokenize(synonym));
        }
    }
    out
}

/// Criteria index for `raw`, built at most once per corpus and profile.
pub fn cached_dsm_index(
    cache: &DsmIndexCache,
    raw: &str,
    profile: &CriteriaProfile,
) -> Arc<Vec<DsmEntry>> {
    let profile_key = format!("{profile:?}");
    let key = content_hash(&[raw.as_bytes(), profile_key.as_bytes()]);
    cache.get_or_build(&key, || build_dsm_index(raw, profile))
}
