use std::collections::HashMap;

use pib_core::domain::Citation;
use serde::{Deserialize, Serialize};

/// Anything that carries citations in display order: a generated template section, a chat
/// answer, ...
pub trait CitationBlock {
    fn citations(&self) -> &[Citation];
}

impl CitationBlock for Vec<Citation> {
    fn citations(&self) -> &[Citation] {
        self.as_slice()
    }
}

impl CitationBlock for [Citation] {
    fn citations(&self) -> &[Citation] {
        self
    }
}

/// Identity used for numbering: the same excerpt from the same source is one citation
/// even when it came from different chunks.
pub fn citation_key(citation: &Citation) -> String {
    format!("{}::{}", citation.source_name, citation.excerpt)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexedCitation {
    pub id: u32,
    pub citation: Citation,
}

/// Sequential, first-occurrence citation numbering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationIndex {
    ids: HashMap<String, u32>,
    entries: Vec<IndexedCitation>,
}

impl CitationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `citation`, assigning the next one if its key is new.
    pub fn push(&mut self, citation: &Citation) -> u32 {
        let key = citation_key(citation);
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id = self.entries.len() as u32 + 1;
        self.ids.insert(key, id);
        self.entries.push(IndexedCitation {
            id,
            citation: citation.clone(),
        });
        id
    }

    pub fn extend_from_block<B: CitationBlock + ?Sized>(&mut self, block: &B) {
        for citation in block.citations() {
            self.push(citation);
        }
    }

    pub fn id_for(&self, citation: &Citation) -> Option<u32> {
        self.ids.get(&citation_key(citation)).copied()
    }

    pub fn ids(&self) -> &HashMap<String, u32> {
        &self.ids
    }

    /// Citations in id order.
    pub fn entries(&self) -> &[IndexedCitation] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Number every distinct citation across `blocks`, in block order then citation order.
pub fn build_citation_index<'a, B, I>(blocks: I) -> CitationIndex
where
    B: CitationBlock + ?Sized + 'a,
    I: IntoIterator<Item = &'a B>,
{
    let mut index = CitationIndex::new();
    let mut blocks_seen = 0usize;
    for block in blocks {
        index.extend_from_block(block);
        blocks_seen += 1;
    }
    tracing::debug!(blocks = blocks_seen, citations = index.len(), "built citation index");
    index
}
