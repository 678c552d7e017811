use crate::document::{DocId, Document, NewDocument, ScoredDocument};
use crate::index::SearchIndex;
use crate::query::QueryOptions;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle to an index shared between threads.
///
/// Searches take the read lock, so any number run at once. Writes take the
/// single write lock for a whole batch: a search sees either none or all of a
/// batch, and never a document's postings without its term frequencies.
#[derive(Debug, Clone, Default)]
pub struct SharedIndex {
    inner: Arc<RwLock<SearchIndex>>,
}

impl From<SearchIndex> for SharedIndex {
    fn from(index: SearchIndex) -> Self {
        Self { inner: Arc::new(RwLock::new(index)) }
    }
}

impl SharedIndex {
    pub fn new(index: SearchIndex) -> Self {
        Self::from(index)
    }

    pub fn search(&self, query: &str, options: &QueryOptions) -> Vec<ScoredDocument> {
        let index = self.inner.read();
        index
            .search_with(query, options)
            .into_iter()
            .map(|hit| hit.into_owned())
            .collect()
    }

    /// Search and also report how many documents matched before `options.limit`.
    pub fn search_counted(&self, query: &str, options: &QueryOptions) -> (usize, Vec<ScoredDocument>) {
        let index = self.inner.read();
        let mut hits = index.search_with(query, &QueryOptions { limit: None, ..options.clone() });
        let total = hits.len();
        if let Some(limit) = options.limit {
            hits.truncate(limit);
        }
        (total, hits.into_iter().map(|hit| hit.into_owned()).collect())
    }

    pub fn get(&self, id: DocId) -> Option<Document> {
        self.inner.read().get(id).cloned()
    }

    pub fn index_document(&self, doc: NewDocument) -> DocId {
        self.inner.write().index_document(doc)
    }

    /// Index `docs` under one write lock; returns the assigned ids in order.
    pub fn index_batch(&self, docs: Vec<NewDocument>) -> Vec<DocId> {
        let mut index = self.inner.write();
        docs.into_iter().map(|doc| index.index_document(doc)).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn term_count(&self) -> usize {
        self.inner.read().term_count()
    }

    /// Run `f` with read access to the underlying index.
    pub fn read<R>(&self, f: impl FnOnce(&SearchIndex) -> R) -> R {
        f(&self.inner.read())
    }
}
