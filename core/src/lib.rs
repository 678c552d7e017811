pub mod corpus;
pub mod document;
pub mod error;
pub mod index;
pub mod postings;
pub mod query;
pub mod shared;
pub mod store;
pub mod tokenizer;

pub use document::{DocId, Document, NewDocument, RawDocument, ScoredDocument, SearchHit};
pub use error::{Error, Result};
pub use index::SearchIndex;
pub use postings::{PostingSet, PostingStore, TermFrequencies};
pub use query::{QueryEngine, QueryOptions, UnseenTerms};
pub use shared::SharedIndex;
pub use store::DocumentStore;
pub use tokenizer::{StopWords, Tokenizer};
