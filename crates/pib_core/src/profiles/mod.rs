use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DocumentType;
use crate::error::{AppError, PROFILE_DECODE_FAILED, PROFILE_READ_FAILED};

/// Weighting tables for evidence ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RankingProfile {
    pub name: String,
    pub document_weights: BTreeMap<DocumentType, f64>,
    /// Used for unspecified document types and types missing from `document_weights`.
    pub default_weight: f64,
    pub hpi_boosts: BTreeMap<DocumentType, f64>,
    pub recency_max_boost: f64,
}

impl RankingProfile {
    pub fn weight_for(&self, document_type: Option<DocumentType>) -> f64 {
        document_type
            .and_then(|t| self.document_weights.get(&t).copied())
            .unwrap_or(self.default_weight)
    }

    pub fn hpi_boost_for(&self, document_type: Option<DocumentType>) -> f64 {
        document_type
            .and_then(|t| self.hpi_boosts.get(&t).copied())
            .unwrap_or(0.0)
    }
}

impl Default for RankingProfile {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            document_weights: BTreeMap::from([
                (DocumentType::DischargeSummary, 1.6),
                (DocumentType::PsychEval, 1.45),
                (DocumentType::ProgressNote, 1.25),
                (DocumentType::Biopsychosocial, 1.2),
                (DocumentType::Intake, 1.1),
                (DocumentType::Other, 1.0),
            ]),
            default_weight: 1.0,
            hpi_boosts: BTreeMap::from([
                (DocumentType::DischargeSummary, 0.5),
                (DocumentType::PsychEval, 0.4),
                (DocumentType::Biopsychosocial, 0.3),
            ]),
            recency_max_boost: 0.35,
        }
    }
}

/// A base clinical term and the phrases that imply it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SynonymGroup {
    pub term: String,
    pub synonyms: Vec<String>,
}

impl SynonymGroup {
    fn new(term: &str, synonyms: &[&str]) -> Self {
        Self {
            term: term.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// True when the base term or any synonym occurs as a substring of `lower_text`.
    ///
    /// Entries are compared trimmed and lowercased, and empty entries never match, so a
    /// table built in code behaves like one read through [`parse_profiles`].
    pub fn triggered_by(&self, lower_text: &str) -> bool {
        std::iter::once(&self.term)
            .chain(&self.synonyms)
            .map(|s| s.trim().to_lowercase())
            .any(|s| !s.is_empty() && lower_text.contains(s.as_str()))
    }

    /// Base term as matched against lowercase text; `None` when blank.
    pub fn normalized_term(&self) -> Option<String> {
        let term = self.term.trim().to_lowercase();
        (!term.is_empty()).then_some(term)
    }
}

/// Vocabulary for diagnostic-criteria extraction and ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CriteriaProfile {
    pub synonyms: Vec<SynonymGroup>,
    /// Title words that earn a bonus when the query mentions their first four letters.
    pub title_bonus_terms: Vec<String>,
}

impl Default for CriteriaProfile {
    fn default() -> Self {
        Self {
            synonyms: vec![
                SynonymGroup::new(
                    "depression",
                    &["mdd", "major depressive", "depressed", "depressive episode", "melancholic"],
                ),
                SynonymGroup::new(
                    "anxiety",
                    &["gad", "generalized anxiety", "anxious", "panic", "worry"],
                ),
                SynonymGroup::new(
                    "bipolar",
                    &["mania", "manic", "hypomania", "hypomanic", "mood swings"],
                ),
                SynonymGroup::new(
                    "psychosis",
                    &["psychotic", "hallucinations", "delusions", "paranoia", "paranoid"],
                ),
                SynonymGroup::new(
                    "ptsd",
                    &["posttraumatic", "post-traumatic", "trauma", "flashbacks", "nightmares"],
                ),
                SynonymGroup::new(
                    "ocd",
                    &["obsessive", "compulsive", "obsessions", "compulsions"],
                ),
                SynonymGroup::new(
                    "adhd",
                    &["attention-deficit", "attention deficit", "hyperactivity", "inattention", "impulsivity"],
                ),
                SynonymGroup::new("autism", &["asd", "autistic", "autism spectrum"]),
                SynonymGroup::new(
                    "schizophrenia",
                    &["schizoaffective", "schizophreniform", "psychotic disorder"],
                ),
                SynonymGroup::new(
                    "borderline",
                    &["bpd", "personality disorder", "emotional dysregulation", "self-injury"],
                ),
                SynonymGroup::new(
                    "substance",
                    &["alcohol", "opioid", "cannabis", "stimulant", "use disorder", "intoxication", "withdrawal"],
                ),
                SynonymGroup::new(
                    "eating",
                    &["anorexia", "bulimia", "binge", "restrictive eating", "arfid"],
                ),
                SynonymGroup::new(
                    "sleep",
                    &["insomnia", "hypersomnolence", "narcolepsy", "circadian"],
                ),
                SynonymGroup::new(
                    "suicide",
                    &["suicidal", "self-harm", "overdose", "suicidality"],
                ),
            ],
            title_bonus_terms: ["disorder", "episode", "syndrome", "type"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Profiles {
    pub ranking: RankingProfile,
    pub criteria: CriteriaProfile,
}

/// Load, normalize, and validate a profile file.
///
/// Omitted fields keep their built-in defaults, so a file may override a single table.
pub fn load_profiles(path: &Path) -> Result<Profiles, AppError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        AppError::new(PROFILE_READ_FAILED, "Failed to read ranking profile")
            .with_details(format!("path={}; err={}", path.display(), e))
    })?;
    parse_profiles(&raw).map_err(|e| {
        let details = match e.details.as_deref() {
            Some(d) => format!("path={}; {d}", path.display()),
            None => format!("path={}", path.display()),
        };
        e.with_details(details)
    })
}

pub fn parse_profiles(raw: &str) -> Result<Profiles, AppError> {
    let mut profiles: Profiles = serde_json::from_str(raw).map_err(|e| {
        AppError::new(PROFILE_DECODE_FAILED, "Failed to decode ranking profile JSON")
            .with_details(e.to_string())
    })?;
    normalize(&mut profiles);
    validate_profiles(&profiles)?;

    tracing::debug!(
        name = profiles.ranking.name.as_str(),
        synonym_groups = profiles.criteria.synonyms.len(),
        "loaded ranking profiles"
    );
    Ok(profiles)
}

fn normalize(profiles: &mut Profiles) {
    for group in profiles.criteria.synonyms.iter_mut() {
        group.term = group.term.trim().to_lowercase();
        group.synonyms = group
            .synonyms
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    for term in profiles.criteria.title_bonus_terms.iter_mut() {
        *term = term.trim().to_lowercase();
    }
}

pub fn validate_profiles(profiles: &Profiles) -> Result<(), AppError> {
    let ranking = &profiles.ranking;
    if !(ranking.default_weight.is_finite() && ranking.default_weight > 0.0) {
        return Err(AppError::profile_invalid("default_weight must be a positive number")
            .with_details(format!("default_weight={}", ranking.default_weight)));
    }
    for (doc_type, weight) in &ranking.document_weights {
        if !(weight.is_finite() && *weight > 0.0) {
            return Err(AppError::profile_invalid("Document weights must be positive numbers")
                .with_details(format!("type={doc_type:?}; weight={weight}")));
        }
    }
    for (doc_type, boost) in &ranking.hpi_boosts {
        if !(boost.is_finite() && *boost >= 0.0) {
            return Err(AppError::profile_invalid("HPI boosts must be non-negative numbers")
                .with_details(format!("type={doc_type:?}; boost={boost}")));
        }
    }
    if !(ranking.recency_max_boost.is_finite() && ranking.recency_max_boost >= 0.0) {
        return Err(AppError::profile_invalid("recency_max_boost must be a non-negative number")
            .with_details(format!("recency_max_boost={}", ranking.recency_max_boost)));
    }

    for group in &profiles.criteria.synonyms {
        if group.term.trim().is_empty() {
            return Err(AppError::profile_invalid("Synonym group term is required"));
        }
    }
    for term in &profiles.criteria.title_bonus_terms {
        // The bonus matches on the term's four-letter prefix.
        if term.chars().count() < 4 {
            return Err(AppError::profile_invalid("Title bonus terms need at least four letters")
                .with_details(format!("term={term}")));
        }
    }
    Ok(())
}
