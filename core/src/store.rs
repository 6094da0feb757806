use std::collections::BTreeMap;

use anyhow::Result;
use parking_lot::Mutex;

use crate::doc::RawDocument;

/// Persistence seam for the batch pipeline. The pipeline reads the whole
/// collection once up front, then writes each annotated document back
/// exactly once; retries and timeouts are the implementation's business.
pub trait DocumentStore: Send + Sync {
    fn load_all(&self) -> Result<Vec<RawDocument>>;
    fn write(&self, doc: &RawDocument) -> Result<()>;
}

/// In-memory store, keyed and enumerated by document id. Used in tests and
/// for embedding the pipeline without a filesystem.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, RawDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, doc: RawDocument) {
        self.docs.lock().insert(doc.id.clone(), doc);
    }

    pub fn get(&self, id: &str) -> Option<RawDocument> {
        self.docs.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.lock().is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<RawDocument>> {
        Ok(self.docs.lock().values().cloned().collect())
    }

    fn write(&self, doc: &RawDocument) -> Result<()> {
        self.docs.lock().insert(doc.id.clone(), doc.clone());
        Ok(())
    }
}
