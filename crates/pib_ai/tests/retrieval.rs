use pib_ai::retrieve::{rank_evidence, rank_evidence_diverse, RankOptions};
use pib_core::domain::Chunk;
use pretty_assertions::assert_eq;

fn chunk(id: &str, source: &str, text: &str) -> Chunk {
    Chunk {
        id: id.to_string(),
        source_id: source.to_string(),
        source_name: format!("{source}.pdf"),
        text: text.to_string(),
        start: 0,
        end: text.chars().count(),
        document_type: None,
        episode_date: None,
        doc_weight: None,
    }
}

fn ids(ranked: &[&Chunk]) -> Vec<String> {
    ranked.iter().map(|c| c.id.clone()).collect()
}

#[test]
fn ranks_by_term_overlap_and_drops_unmatched() {
    let chunks = vec![
        chunk("a", "s1", "patient reports insomnia nightly"),
        chunk("b", "s1", "no sleep complaints"),
        chunk("c", "s1", "unrelated text"),
    ];
    let ranked = rank_evidence("insomnia sleep", &chunks, 2);
    assert_eq!(ids(&ranked), vec!["a", "b"]);

    let ranked = rank_evidence("insomnia sleep", &chunks, 10);
    assert_eq!(ids(&ranked), vec!["a", "b"]);
}

#[test]
fn repeated_occurrences_count_toward_score() {
    let chunks = vec![
        chunk("once", "s1", "anxiety noted"),
        chunk("thrice", "s1", "anxiety, anxiety and more anxiety"),
    ];
    let ranked = rank_evidence("anxiety anxiety", &chunks, 2);
    assert_eq!(ids(&ranked), vec!["thrice", "once"]);
}

#[test]
fn empty_query_returns_prefix_in_input_order() {
    let chunks = vec![
        chunk("a", "s1", "alpha"),
        chunk("b", "s2", "beta"),
        chunk("c", "s3", "gamma"),
    ];
    for query in ["", "   ", "a b ?", "é!"] {
        assert_eq!(ids(&rank_evidence(query, &chunks, 2)), vec!["a", "b"]);
        assert_eq!(
            ids(&rank_evidence_diverse(query, &chunks, 2, RankOptions::default())),
            vec!["a", "b"]
        );
    }
    assert!(rank_evidence("", &[], 5).is_empty());
    assert!(rank_evidence("", &chunks, 0).is_empty());
}

#[test]
fn ties_keep_input_order_and_output_is_deterministic() {
    let chunks: Vec<Chunk> = (0..20)
        .map(|i| chunk(&format!("c{i:02}"), "s1", "mood low, sleep poor"))
        .collect();
    let first = rank_evidence("mood sleep", &chunks, 20);
    let expected: Vec<String> = (0..20).map(|i| format!("c{i:02}")).collect();
    assert_eq!(ids(&first), expected);

    for _ in 0..5 {
        assert_eq!(ids(&rank_evidence("mood sleep", &chunks, 20)), expected);
    }
}

#[test]
fn adding_a_matching_token_never_lowers_rank() {
    let chunks = vec![
        chunk("plain", "s1", "reports poor appetite"),
        chunk("plus", "s1", "reports poor appetite and weight loss"),
    ];
    let ranked = rank_evidence("appetite weight", &chunks, 2);
    assert_eq!(ids(&ranked), vec!["plus", "plain"]);
}

#[test]
fn diverse_selection_represents_every_matched_source_first() {
    let chunks = vec![
        chunk("big1", "verbose", "depression depression depression sleep"),
        chunk("big2", "verbose", "depression depression sleep"),
        chunk("big3", "verbose", "depression sleep"),
        chunk("small", "terse", "depression noted"),
        chunk("none", "other", "vitals stable"),
    ];

    let plain = rank_evidence("depression sleep", &chunks, 3);
    assert_eq!(ids(&plain), vec!["big1", "big2", "big3"]);

    let diverse = rank_evidence_diverse("depression sleep", &chunks, 3, RankOptions::default());
    assert_eq!(ids(&diverse), vec!["big1", "small", "big2"]);
}

#[test]
fn diverse_fill_phase_never_admits_zero_scores() {
    let chunks = vec![
        chunk("hit", "s1", "panic attacks weekly"),
        chunk("miss1", "s1", "vitals stable"),
        chunk("miss2", "s2", "labs normal"),
    ];
    let ranked = rank_evidence_diverse("panic", &chunks, 5, RankOptions::default());
    assert_eq!(ids(&ranked), vec!["hit"]);
}

#[test]
fn unmatched_sources_get_one_slot_only_when_requested() {
    let chunks = vec![
        chunk("hit1", "s1", "panic attacks weekly"),
        chunk("hit2", "s1", "panic on public transport"),
        chunk("miss_a", "s2", "labs normal"),
        chunk("miss_b", "s2", "vitals stable"),
        chunk("miss_c", "s3", "no acute distress"),
    ];
    let opts = RankOptions {
        include_unmatched_sources: true,
    };
    let ranked = rank_evidence_diverse("panic", &chunks, 5, opts);
    // Matched source first, then each unmatched source's first chunk, then the fill.
    assert_eq!(ids(&ranked), vec!["hit1", "miss_a", "miss_c", "hit2"]);

    let ranked = rank_evidence_diverse("panic", &chunks, 2, opts);
    assert_eq!(ids(&ranked), vec!["hit1", "miss_a"]);
}

#[test]
fn diverse_candidate_ties_keep_input_order() {
    let chunks = vec![
        chunk("b1", "b", "trauma history"),
        chunk("a1", "a", "trauma history"),
        chunk("c1", "c", "trauma history"),
    ];
    let ranked = rank_evidence_diverse("trauma", &chunks, 3, RankOptions::default());
    assert_eq!(ids(&ranked), vec!["b1", "a1", "c1"]);
}
