use std::collections::HashSet;

use time::Date;

use crate::doc::Corpus;
use crate::tfidf::TfIdf;

pub const DEFAULT_TOP_K: usize = 5;

const TAG_WEIGHT: f64 = 0.4;
const TFIDF_WEIGHT: f64 = 0.4;
const RECENCY_WEIGHT: f64 = 0.2;
const RECENCY_DECAY_DAYS: f64 = 30.0;

/// One scored candidate for a source document. Only the candidate id ends up
/// in persisted metadata; the title rides along for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    pub source: String,
    pub candidate: String,
    pub title: String,
    pub score: f64,
}

/// Share of tags in common relative to the larger tag set. Two empty tag sets
/// overlap by 0, not NaN.
pub fn tag_overlap(a: &[String], b: &[String]) -> f64 {
    let denom = a.len().max(b.len());
    if denom == 0 {
        return 0.0;
    }
    let b_set: HashSet<&str> = b.iter().map(|s| s.as_str()).collect();
    let shared = a.iter().filter(|t| b_set.contains(t.as_str())).count();
    shared as f64 / denom as f64
}

/// Exponential decay over the day gap between two dates, 30-day constant.
/// A missing or unparseable date on either side contributes 0.
pub fn recency(a: Option<Date>, b: Option<Date>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => {
            let days = (a.to_julian_day() - b.to_julian_day()).abs() as f64;
            (-days / RECENCY_DECAY_DAYS).exp()
        }
        _ => 0.0,
    }
}

/// Unnormalized dot product over the deduplicated union of both documents'
/// terms. Deliberately not cosine similarity: magnitudes are kept, so it can
/// exceed 1 for documents sharing many high-weight terms.
fn term_similarity(source: usize, other: usize, corpus: &Corpus, tfidf: &TfIdf) -> f64 {
    let docs = corpus.docs();
    let union: HashSet<&str> = docs[source]
        .terms
        .iter()
        .chain(docs[other].terms.iter())
        .map(|s| s.as_str())
        .collect();
    union
        .iter()
        .map(|term| tfidf.score(term, source) * tfidf.score(term, other))
        .sum()
}

/// Score every other corpus member against the source and return the top
/// `top_k` matches, descending by combined score. Stable sort, so ties keep
/// corpus enumeration order. A candidate whose score degenerates to a
/// non-finite value is clamped to the bottom instead of aborting the ranking.
pub fn rank(source: usize, corpus: &Corpus, tfidf: &TfIdf, top_k: usize) -> Vec<SimilarityResult> {
    let docs = corpus.docs();
    let src = &docs[source];
    let mut results: Vec<SimilarityResult> = Vec::with_capacity(docs.len().saturating_sub(1));
    for (idx, other) in docs.iter().enumerate() {
        if idx == source {
            continue;
        }
        let tags = tag_overlap(&src.front.tags, &other.front.tags);
        let terms = term_similarity(source, idx, corpus, tfidf);
        let freshness = recency(src.date, other.date);
        let mut score = TAG_WEIGHT * tags + TFIDF_WEIGHT * terms + RECENCY_WEIGHT * freshness;
        if !score.is_finite() {
            tracing::debug!(source = %src.id, candidate = %other.id, "non-finite score, clamping");
            score = f64::MIN;
        }
        results.push(SimilarityResult {
            source: src.id.clone(),
            candidate: other.id.clone(),
            title: other.front.title.clone(),
            score,
        });
    }
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(top_k);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Corpus, FrontMatter, RawDocument};
    use time::macros::date;

    fn doc(id: &str, tags: &[&str], date: &str, body: &str) -> RawDocument {
        RawDocument {
            id: id.into(),
            front: FrontMatter {
                title: id.to_uppercase(),
                date: Some(date.into()),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                ..Default::default()
            },
            body: body.into(),
        }
    }

    fn scenario_corpus() -> Corpus {
        Corpus::from_raw(vec![
            doc("a", &["ai", "tech"], "2024-01-01", "a i tech news"),
            doc("b", &["ai"], "2024-01-02", "a i news"),
            doc("c", &["finance"], "2024-06-01", "money stock"),
        ])
        .unwrap()
    }

    #[test]
    fn tag_overlap_bounds() {
        let ai: Vec<String> = vec!["ai".into()];
        let ai_tech: Vec<String> = vec!["ai".into(), "tech".into()];
        let fin: Vec<String> = vec!["finance".into()];
        let none: Vec<String> = vec![];
        assert_eq!(tag_overlap(&ai, &ai), 1.0);
        assert_eq!(tag_overlap(&ai_tech, &ai), 0.5);
        assert_eq!(tag_overlap(&ai, &fin), 0.0);
        assert_eq!(tag_overlap(&none, &ai), 0.0);
        assert_eq!(tag_overlap(&none, &none), 0.0);
    }

    #[test]
    fn recency_decays_monotonically() {
        let base = Some(date!(2024 - 01 - 01));
        let r1 = recency(base, Some(date!(2024 - 01 - 02)));
        let r2 = recency(base, Some(date!(2024 - 02 - 01)));
        let r3 = recency(base, Some(date!(2024 - 06 - 01)));
        assert_eq!(recency(base, base), 1.0);
        assert!(r1 > r2 && r2 > r3);
        assert!(r3 > 0.0);
    }

    #[test]
    fn missing_date_scores_zero_recency() {
        assert_eq!(recency(None, Some(date!(2024 - 01 - 01))), 0.0);
        assert_eq!(recency(Some(date!(2024 - 01 - 01)), None), 0.0);
        assert_eq!(recency(None, None), 0.0);
    }

    #[test]
    fn ranks_tagged_recent_neighbor_first() {
        let corpus = scenario_corpus();
        let tfidf = TfIdf::build(&corpus);
        let ranked = rank(0, &corpus, &tfidf, 5);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate, "b");
        assert_eq!(ranked[1].candidate, "c");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn never_recommends_self() {
        let corpus = scenario_corpus();
        let tfidf = TfIdf::build(&corpus);
        for i in 0..corpus.len() {
            let id = &corpus.docs()[i].id;
            assert!(rank(i, &corpus, &tfidf, 5).iter().all(|r| &r.candidate != id));
        }
    }

    #[test]
    fn result_length_is_bounded() {
        let corpus = scenario_corpus();
        let tfidf = TfIdf::build(&corpus);
        assert_eq!(rank(0, &corpus, &tfidf, 1).len(), 1);
        assert_eq!(rank(0, &corpus, &tfidf, 5).len(), 2);
        assert_eq!(rank(0, &corpus, &tfidf, 0).len(), 0);
    }

    #[test]
    fn single_document_corpus_yields_empty_ranking() {
        let corpus = Corpus::from_raw(vec![doc("only", &["ai"], "2024-01-01", "text")]).unwrap();
        let tfidf = TfIdf::build(&corpus);
        assert!(rank(0, &corpus, &tfidf, 5).is_empty());
    }

    #[test]
    fn ranking_is_deterministic() {
        let corpus = scenario_corpus();
        let tfidf = TfIdf::build(&corpus);
        assert_eq!(rank(0, &corpus, &tfidf, 5), rank(0, &corpus, &tfidf, 5));
    }

    #[test]
    fn ties_keep_corpus_order() {
        // Two identical candidates score identically; stable sort keeps the
        // earlier corpus entry first.
        let corpus = Corpus::from_raw(vec![
            doc("src", &["ai"], "2024-01-01", "alpha beta"),
            doc("twin1", &["ai"], "2024-01-01", "alpha beta"),
            doc("twin2", &["ai"], "2024-01-01", "alpha beta"),
        ])
        .unwrap();
        let tfidf = TfIdf::build(&corpus);
        let ranked = rank(0, &corpus, &tfidf, 5);
        assert_eq!(ranked[0].candidate, "twin1");
        assert_eq!(ranked[1].candidate, "twin2");
        assert_eq!(ranked[0].score, ranked[1].score);
    }

    #[test]
    fn malformed_candidate_date_degrades_instead_of_failing() {
        let mut bad = doc("bad", &["ai"], "2024-01-02", "a i news");
        bad.front.date = Some("yesterday-ish".into());
        let corpus = Corpus::from_raw(vec![
            doc("a", &["ai", "tech"], "2024-01-01", "a i tech news"),
            bad,
            doc("c", &["finance"], "2024-06-01", "money stock"),
        ])
        .unwrap();
        let tfidf = TfIdf::build(&corpus);
        let ranked = rank(0, &corpus, &tfidf, 5);
        // Still ranked on tags and terms, just with zero recency.
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate, "bad");
    }
}
