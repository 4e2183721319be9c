use std::collections::HashMap;

use pib_core::domain::{Chunk, DocumentType, SourceDoc};
use pib_core::normalize::dates::episode_timestamp;
use pib_core::profiles::RankingProfile;

/// Linear map from the corpus date range onto `[0, max_boost]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RecencyScale {
    oldest: i64,
    newest: i64,
    max_boost: f64,
}

impl RecencyScale {
    /// `None` unless at least two distinct dates parse.
    pub(crate) fn from_timestamps(
        timestamps: impl IntoIterator<Item = i64>,
        max_boost: f64,
    ) -> Option<Self> {
        let mut range: Option<(i64, i64)> = None;
        for ts in timestamps {
            range = Some(match range {
                Some((lo, hi)) => (lo.min(ts), hi.max(ts)),
                None => (ts, ts),
            });
        }
        let (oldest, newest) = range?;
        if oldest == newest {
            return None;
        }
        Some(Self {
            oldest,
            newest,
            max_boost,
        })
    }

    pub(crate) fn boost(&self, ts: i64) -> f64 {
        let span = (self.newest - self.oldest) as f64;
        let position = ((ts - self.oldest) as f64 / span).clamp(0.0, 1.0);
        position * self.max_boost
    }
}

/// Per-chunk score components for the weighted ranker.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceWeight {
    pub doc_weight: f64,
    pub recency_boost: f64,
    pub hpi_boost: f64,
}

impl EvidenceWeight {
    pub fn apply(&self, raw_score: usize) -> f64 {
        raw_score as f64 * self.doc_weight + self.recency_boost + self.hpi_boost
    }
}

/// Resolves document type, weight and episode date for chunks of one corpus.
pub(crate) struct EvidenceWeighting<'a> {
    profile: &'a RankingProfile,
    docs_by_id: HashMap<&'a str, &'a SourceDoc>,
    doc_timestamps: HashMap<&'a str, i64>,
    recency: Option<RecencyScale>,
    prioritize_for_hpi: bool,
}

impl<'a> EvidenceWeighting<'a> {
    pub(crate) fn new(
        chunks: &[Chunk],
        docs: &'a [SourceDoc],
        profile: &'a RankingProfile,
        prioritize_for_hpi: bool,
    ) -> Self {
        let mut docs_by_id: HashMap<&'a str, &'a SourceDoc> = HashMap::new();
        for doc in docs {
            // First document wins on duplicate ids.
            docs_by_id.entry(doc.id.as_str()).or_insert(doc);
        }

        let doc_timestamps: HashMap<&'a str, i64> = docs_by_id
            .iter()
            .filter_map(|(id, doc)| {
                let ts = episode_timestamp(doc.episode_date.as_deref()?)?;
                Some((*id, ts))
            })
            .collect();

        let chunk_timestamps = chunks
            .iter()
            .filter_map(|c| c.episode_date.as_deref().and_then(episode_timestamp));
        let recency = RecencyScale::from_timestamps(
            doc_timestamps.values().copied().chain(chunk_timestamps),
            profile.recency_max_boost,
        );

        Self {
            profile,
            docs_by_id,
            doc_timestamps,
            recency,
            prioritize_for_hpi,
        }
    }

    fn document_type(&self, chunk: &Chunk) -> Option<DocumentType> {
        chunk.document_type.or_else(|| {
            self.docs_by_id
                .get(chunk.source_id.as_str())
                .and_then(|doc| doc.document_type)
        })
    }

    fn episode_timestamp(&self, chunk: &Chunk) -> Option<i64> {
        chunk
            .episode_date
            .as_deref()
            .and_then(episode_timestamp)
            .or_else(|| self.doc_timestamps.get(chunk.source_id.as_str()).copied())
    }

    pub(crate) fn weight(&self, chunk: &Chunk) -> EvidenceWeight {
        let document_type = self.document_type(chunk);
        let doc_weight = chunk
            .doc_weight
            .unwrap_or_else(|| self.profile.weight_for(document_type));
        let recency_boost = match (self.recency, self.episode_timestamp(chunk)) {
            (Some(scale), Some(ts)) => scale.boost(ts),
            _ => 0.0,
        };
        let hpi_boost = if self.prioritize_for_hpi {
            self.profile.hpi_boost_for(document_type)
        } else {
            0.0
        };

        EvidenceWeight {
            doc_weight,
            recency_boost,
            hpi_boost,
        }
    }
}
