pub mod doc;
pub mod pipeline;
pub mod render;
pub mod similarity;
pub mod store;
pub mod tfidf;
pub mod tokenizer;

pub use doc::{Corpus, Document, FrontMatter, RawDocument};
pub use similarity::SimilarityResult;
pub use store::{DocumentStore, MemoryStore};
