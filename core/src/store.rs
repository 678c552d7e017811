use crate::document::{DocId, Document, NewDocument};

/// Ids are `u32`, so one store holds at most this many documents.
pub const MAX_DOCUMENTS: usize = DocId::MAX as usize;

/// Owns every inserted document and hands out ids starting at 1.
#[derive(Debug, Default)]
pub struct DocumentStore {
    // Slot `i` holds the document with id `i + 1`.
    docs: Vec<Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next insert will receive, `None` once [`MAX_DOCUMENTS`] are stored.
    pub fn next_id(&self) -> Option<DocId> {
        id_after(self.docs.len())
    }

    /// # Panics
    ///
    /// When the store already holds [`MAX_DOCUMENTS`] documents.
    pub fn insert(&mut self, doc: NewDocument) -> DocId {
        let id = self.next_id().expect("document id space exhausted");
        self.docs.push(doc.into_document(id));
        id
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        let slot = (id as usize).checked_sub(1)?;
        self.docs.get(slot)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Documents in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> + '_ {
        self.docs.iter()
    }
}

fn id_after(stored: usize) -> Option<DocId> {
    DocId::try_from(stored.checked_add(1)?).ok()
}
