use std::collections::HashMap;

use crate::doc::Corpus;

/// Corpus-frozen TF-IDF statistics: per-document term counts and corpus-wide
/// document frequencies, accumulated in a single pass so the pairwise
/// comparison loop never recomputes them.
pub struct TfIdf {
    df: HashMap<String, u32>,
    counts: Vec<HashMap<String, u32>>,
    doc_lens: Vec<usize>,
    num_docs: usize,
}

impl TfIdf {
    pub fn build(corpus: &Corpus) -> Self {
        let mut df: HashMap<String, u32> = HashMap::new();
        let mut counts = Vec::with_capacity(corpus.len());
        let mut doc_lens = Vec::with_capacity(corpus.len());
        for doc in corpus.docs() {
            let mut tf: HashMap<String, u32> = HashMap::new();
            for term in &doc.terms {
                *tf.entry(term.clone()).or_insert(0) += 1;
            }
            for term in tf.keys() {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
            doc_lens.push(doc.terms.len());
            counts.push(tf);
        }
        TfIdf { df, counts, doc_lens, num_docs: corpus.len() }
    }

    /// Weight for (term, document): `tf * idf` with `tf = count / doc_len`
    /// (0 for an empty document) and `idf = ln(n / (1 + df))`. The `+1`
    /// guards division by zero for terms absent from the corpus and dampens
    /// terms present in every document.
    pub fn score(&self, term: &str, doc: usize) -> f64 {
        let len = self.doc_lens[doc];
        if len == 0 {
            return 0.0;
        }
        let count = self.counts[doc].get(term).copied().unwrap_or(0);
        if count == 0 {
            return 0.0;
        }
        let tf = count as f64 / len as f64;
        let df = self.df.get(term).copied().unwrap_or(0);
        let idf = (self.num_docs as f64 / (1.0 + df as f64)).ln();
        tf * idf
    }

    pub fn num_docs(&self) -> usize {
        self.num_docs
    }

    pub fn vocabulary_len(&self) -> usize {
        self.df.len()
    }
}
