use crate::document::{DocId, Document, NewDocument, SearchHit};
use crate::postings::PostingStore;
use crate::query::{QueryEngine, QueryOptions};
use crate::store::DocumentStore;
use crate::tokenizer::Tokenizer;

/// In-memory full-text index: the documents, their postings and the tokenizer
/// used for both indexing and querying.
#[derive(Debug, Default)]
pub struct SearchIndex {
    tokenizer: Tokenizer,
    documents: DocumentStore,
    postings: PostingStore,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokenizer(tokenizer: Tokenizer) -> Self {
        Self { tokenizer, documents: DocumentStore::new(), postings: PostingStore::new() }
    }

    /// Store `doc`, index its title and abstract, and return its id.
    pub fn index_document(&mut self, doc: NewDocument) -> DocId {
        let terms = self.tokenizer.tokenize(&doc.full_text());
        let id = self.documents.insert(doc);
        self.postings.index_document(id, &terms);
        tracing::debug!(doc_id = id, terms = terms.len(), "indexed document");
        id
    }

    /// Index every document in order; returns how many were added.
    pub fn index_all<I>(&mut self, docs: I) -> usize
    where
        I: IntoIterator<Item = NewDocument>,
    {
        let before = self.documents.len();
        for doc in docs {
            self.index_document(doc);
        }
        let added = self.documents.len() - before;
        tracing::info!(added, num_docs = self.documents.len(), num_terms = self.postings.term_count(), "indexed batch");
        added
    }

    pub fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(self)
    }

    /// Ranked documents matching every known query term.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        self.engine().search(query)
    }

    pub fn search_with(&self, query: &str, options: &QueryOptions) -> Vec<SearchHit<'_>> {
        self.engine().search_with(query, options)
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn term_count(&self) -> usize {
        self.postings.term_count()
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn postings(&self) -> &PostingStore {
        &self.postings
    }
}
