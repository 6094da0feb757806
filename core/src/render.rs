use crate::doc::{Document, RawDocument};
use crate::similarity::SimilarityResult;

const MARKER: &str = "\n\n## Recommended Articles\n";
const FOOTER: &str =
    "*These recommendations are automatically generated based on content similarity and trending topics.*";

/// Render the appended recommendation section: one markdown link per
/// candidate, keyed by the candidate's stable identifier.
pub fn render_block(results: &[SimilarityResult]) -> String {
    let links: Vec<String> = results
        .iter()
        .map(|r| format!("- [{}](/articles/{})", r.title, r.candidate))
        .collect();
    format!("{MARKER}\n{}\n\n---\n\n{FOOTER}\n", links.join("\n"))
}

/// Drop a previously generated recommendation section, returning the original
/// body. Re-runs must tokenize and score only this text or the term model
/// drifts as appended sections accumulate.
pub fn strip_generated(body: &str) -> &str {
    match body.find(MARKER) {
        Some(idx) => &body[..idx],
        None => body,
    }
}

/// Fold ranked results into the document: ordered candidate identifiers in
/// the `recommendations` front-matter field, regenerated section appended
/// after the untouched original body.
pub fn apply(doc: &Document, results: &[SimilarityResult]) -> RawDocument {
    let mut front = doc.front.clone();
    front.recommendations = results.iter().map(|r| r.candidate.clone()).collect();
    RawDocument {
        id: doc.id.clone(),
        front,
        body: format!("{}{}", doc.body, render_block(results)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{FrontMatter, RawDocument};

    fn result(candidate: &str, title: &str) -> SimilarityResult {
        SimilarityResult {
            source: "src".into(),
            candidate: candidate.into(),
            title: title.into(),
            score: 1.0,
        }
    }

    #[test]
    fn block_links_candidates_by_id() {
        let block = render_block(&[result("rust-in-2024", "Rust in 2024"), result("ai-news", "AI News")]);
        assert!(block.starts_with("\n\n## Recommended Articles\n\n"));
        assert!(block.contains("- [Rust in 2024](/articles/rust-in-2024)\n- [AI News](/articles/ai-news)"));
        assert!(block.ends_with(&format!("---\n\n{FOOTER}\n")));
    }

    #[test]
    fn strip_undoes_append() {
        let body = "Original body.\n\nWith two paragraphs.";
        let appended = format!("{body}{}", render_block(&[result("x", "X")]));
        assert_eq!(strip_generated(&appended), body);
        assert_eq!(strip_generated(body), body);
    }

    #[test]
    fn apply_sets_recommendation_ids_and_appends() {
        let doc = crate::doc::Document::from_raw(RawDocument {
            id: "a".into(),
            front: FrontMatter { title: "A".into(), ..Default::default() },
            body: "Body text.".into(),
        });
        let updated = apply(&doc, &[result("b", "B"), result("c", "C")]);
        assert_eq!(updated.front.recommendations, vec!["b", "c"]);
        assert!(updated.body.starts_with("Body text.\n\n## Recommended Articles"));
    }

    #[test]
    fn rendering_same_results_twice_is_identical() {
        let results = vec![result("b", "B")];
        assert_eq!(render_block(&results), render_block(&results));
    }
}
