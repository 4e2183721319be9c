use std::fs;

use pib_core::domain::DocumentType;
use pib_core::error::{
    AppError, PROFILE_DECODE_FAILED, PROFILE_READ_FAILED, VALIDATION_PROFILE_INVALID,
};
use pib_core::profiles::{
    load_profiles, parse_profiles, validate_profiles, Profiles, RankingProfile, SynonymGroup,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn built_in_tables_match_clinical_defaults() {
    let profiles = Profiles::default();
    validate_profiles(&profiles).expect("defaults are valid");

    let r = &profiles.ranking;
    assert_eq!(r.weight_for(Some(DocumentType::DischargeSummary)), 1.6);
    assert_eq!(r.weight_for(Some(DocumentType::PsychEval)), 1.45);
    assert_eq!(r.weight_for(Some(DocumentType::ProgressNote)), 1.25);
    assert_eq!(r.weight_for(Some(DocumentType::Biopsychosocial)), 1.2);
    assert_eq!(r.weight_for(Some(DocumentType::Intake)), 1.1);
    assert_eq!(r.weight_for(Some(DocumentType::Other)), 1.0);
    assert_eq!(r.weight_for(None), 1.0);

    assert_eq!(r.hpi_boost_for(Some(DocumentType::DischargeSummary)), 0.5);
    assert_eq!(r.hpi_boost_for(Some(DocumentType::PsychEval)), 0.4);
    assert_eq!(r.hpi_boost_for(Some(DocumentType::Biopsychosocial)), 0.3);
    assert_eq!(r.hpi_boost_for(Some(DocumentType::Intake)), 0.0);
    assert_eq!(r.recency_max_boost, 0.35);

    let depression = profiles
        .criteria
        .synonyms
        .iter()
        .find(|g| g.term == "depression")
        .expect("depression group");
    assert!(depression.synonyms.iter().any(|s| s == "major depressive"));
    assert!(depression.triggered_by("history of mdd"));
    assert!(!depression.triggered_by("panic attacks"));
}

#[test]
fn partial_profile_overrides_only_named_fields() {
    let raw = r#"{
        "ranking": {
            "name": "forensic",
            "document_weights": { "intake": 2.0 }
        },
        "criteria": {
            "synonyms": [ { "term": " Gambling ", "synonyms": ["Betting", "  "] } ]
        }
    }"#;
    let profiles = parse_profiles(raw).expect("parse");

    assert_eq!(profiles.ranking.name, "forensic");
    assert_eq!(profiles.ranking.weight_for(Some(DocumentType::Intake)), 2.0);
    // Replaced map: other types now fall back to the default weight.
    assert_eq!(profiles.ranking.weight_for(Some(DocumentType::DischargeSummary)), 1.0);
    assert_eq!(profiles.ranking.recency_max_boost, 0.35);

    assert_eq!(profiles.criteria.synonyms.len(), 1);
    assert_eq!(profiles.criteria.synonyms[0].term, "gambling");
    assert_eq!(profiles.criteria.synonyms[0].synonyms, vec!["betting".to_string()]);
    assert_eq!(
        profiles.criteria.title_bonus_terms,
        vec!["disorder", "episode", "syndrome", "type"]
    );
}

#[test]
fn rejects_invalid_numbers_and_terms() {
    let err = parse_profiles(r#"{ "ranking": { "document_weights": { "psych-eval": 0 } } }"#)
        .unwrap_err();
    assert_eq!(err.code, VALIDATION_PROFILE_INVALID);

    let err = parse_profiles(r#"{ "ranking": { "recency_max_boost": -0.1 } }"#).unwrap_err();
    assert_eq!(err.code, VALIDATION_PROFILE_INVALID);

    let err = parse_profiles(r#"{ "criteria": { "title_bonus_terms": ["tic"] } }"#).unwrap_err();
    assert_eq!(err.code, VALIDATION_PROFILE_INVALID);

    let err = parse_profiles(r#"{ "criteria": { "synonyms": [ { "term": " ", "synonyms": [] } ] } }"#)
        .unwrap_err();
    assert_eq!(err.code, VALIDATION_PROFILE_INVALID);

    let mut bad = Profiles::default();
    bad.ranking = RankingProfile {
        default_weight: f64::NAN,
        ..RankingProfile::default()
    };
    assert!(validate_profiles(&bad).is_err());
}

#[test]
fn rejects_unknown_document_type_and_malformed_json() {
    let err = parse_profiles(r#"{ "ranking": { "document_weights": { "radiology": 1.2 } } }"#)
        .unwrap_err();
    assert_eq!(err.code, PROFILE_DECODE_FAILED);

    let err = parse_profiles("{ not json").unwrap_err();
    assert_eq!(err.code, PROFILE_DECODE_FAILED);
}

#[test]
fn loads_profile_file_and_reports_missing_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("profile.json");
    fs::write(&path, r#"{ "ranking": { "hpi_boosts": { "intake": 0.25 } } }"#).unwrap();

    let profiles = load_profiles(&path).expect("load");
    assert_eq!(profiles.ranking.hpi_boost_for(Some(DocumentType::Intake)), 0.25);
    assert_eq!(profiles.ranking.hpi_boost_for(Some(DocumentType::PsychEval)), 0.0);

    let err: AppError = load_profiles(&dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.code, PROFILE_READ_FAILED);
    assert!(err.details.unwrap_or_default().contains("missing.json"));

    fs::write(&path, "42").unwrap();
    let err = load_profiles(&path).unwrap_err();
    assert_eq!(err.code, PROFILE_DECODE_FAILED);
    assert!(err.details.unwrap_or_default().starts_with("path="));
}

#[test]
fn in_code_synonym_groups_match_like_loaded_ones() {
    let group = SynonymGroup {
        term: " PTSD ".to_string(),
        synonyms: vec!["Flashbacks".to_string(), "".to_string(), "   ".to_string()],
    };
    assert!(group.triggered_by("reports ptsd since 2019"));
    assert!(group.triggered_by("nightly flashbacks"));
    assert!(!group.triggered_by("no relevant history"));
    assert_eq!(group.normalized_term().as_deref(), Some("ptsd"));

    let blank = SynonymGroup {
        term: "  ".to_string(),
        synonyms: vec!["".to_string()],
    };
    assert!(!blank.triggered_by("anything at all"));
    assert_eq!(blank.normalized_term(), None);
}
