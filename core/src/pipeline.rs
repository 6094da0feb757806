use anyhow::Result;
use rayon::prelude::*;

use crate::doc::Corpus;
use crate::render;
use crate::similarity::{self, DEFAULT_TOP_K};
use crate::store::DocumentStore;
use crate::tfidf::TfIdf;

pub struct RunOptions {
    pub top_k: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K }
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub documents: usize,
}

/// Two-phase batch run: load and freeze the full corpus, then score and
/// write each document against that snapshot. No document's ranking ever
/// sees another document's in-flight write, so the score-and-write phase
/// fans out across a worker pool. The first write failure aborts the run;
/// documents already written stay written.
pub fn run(store: &dyn DocumentStore, opts: &RunOptions) -> Result<RunSummary> {
    let raw = store.load_all()?;
    let corpus = Corpus::from_raw(raw)?;
    let tfidf = TfIdf::build(&corpus);
    tracing::info!(
        num_docs = corpus.len(),
        vocabulary = tfidf.vocabulary_len(),
        "corpus frozen"
    );

    corpus
        .docs()
        .par_iter()
        .enumerate()
        .try_for_each(|(idx, doc)| {
            let ranked = similarity::rank(idx, &corpus, &tfidf, opts.top_k);
            let updated = render::apply(doc, &ranked);
            store.write(&updated)?;
            tracing::debug!(id = %doc.id, recommendations = ranked.len(), "document updated");
            Ok::<_, anyhow::Error>(())
        })?;

    Ok(RunSummary { documents: corpus.len() })
}
