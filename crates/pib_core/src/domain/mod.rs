use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Clinical document category used for evidence weighting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    DischargeSummary,
    PsychEval,
    ProgressNote,
    Biopsychosocial,
    Intake,
    Other,
}

/// Contiguous span of a source document's extracted text.
///
/// Notes:
/// - `start`/`end` are character offsets into the source text, kept for traceability only.
/// - `document_type` and `episode_date` override the owning document's values when present.
/// - `doc_weight` overrides the profile's document-type weight entirely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub id: String,
    pub source_id: String,
    pub source_name: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceDoc {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_date: Option<String>,
    #[serde(default)]
    pub chunks: Vec<Chunk>,
}

/// Reference to a chunk plus the excerpt shown to the reader.
///
/// Identity for numbering is `(source_name, excerpt)`, not `chunk_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub source_id: String,
    pub source_name: String,
    pub chunk_id: String,
    pub excerpt: String,
}

/// One extracted "diagnostic criteria" block from the reference corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DsmEntry {
    pub id: String,
    pub title: String,
    pub text: String,
    pub keywords: BTreeSet<String>,
}
