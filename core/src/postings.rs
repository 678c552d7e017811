use crate::document::DocId;
use roaring::RoaringBitmap;
use std::collections::HashMap;

/// Sorted set of unique document ids containing one term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostingSet {
    ids: RoaringBitmap,
}

impl PostingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the id was already present.
    pub fn insert(&mut self, doc_id: DocId) -> bool {
        self.ids.insert(doc_id)
    }

    pub fn contains(&self, doc_id: DocId) -> bool {
        self.ids.contains(doc_id)
    }

    pub fn len(&self) -> u64 {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.ids.iter()
    }

    /// Ids present in every one of `sets`. No sets at all gives an empty set.
    pub fn intersect_all(sets: &[&PostingSet]) -> PostingSet {
        let mut ordered: Vec<&PostingSet> = sets.to_vec();
        ordered.sort_by_key(|s| s.len());
        let mut iter = ordered.into_iter();
        let Some(smallest) = iter.next() else {
            return PostingSet::new();
        };
        let mut ids = smallest.ids.clone();
        for set in iter {
            if ids.is_empty() {
                break;
            }
            ids &= &set.ids;
        }
        PostingSet { ids }
    }
}

impl FromIterator<DocId> for PostingSet {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self {
        PostingSet { ids: iter.into_iter().collect() }
    }
}

/// Occurrence count of every term in one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermFrequencies {
    counts: HashMap<String, u32>,
}

impl TermFrequencies {
    pub fn from_terms<S: AsRef<str>>(terms: &[S]) -> Self {
        let mut counts: HashMap<String, u32> = HashMap::new();
        for term in terms {
            *counts.entry(term.as_ref().to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn get(&self, term: &str) -> Option<u32> {
        self.counts.get(term).copied()
    }

    /// Sum of all counts, i.e. the number of terms the document produced.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.counts.iter().map(|(t, &c)| (t.as_str(), c))
    }
}

/// Inverted index: term -> posting set, and doc id -> term frequencies.
#[derive(Debug, Default)]
pub struct PostingStore {
    postings: HashMap<String, PostingSet>,
    frequencies: HashMap<DocId, TermFrequencies>,
}

impl PostingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `terms` (already normalized, in document order) for `doc_id`.
    pub fn index_document<S: AsRef<str>>(&mut self, doc_id: DocId, terms: &[S]) {
        let frequencies = TermFrequencies::from_terms(terms);
        for (term, _) in frequencies.iter() {
            match self.postings.get_mut(term) {
                Some(set) => {
                    set.insert(doc_id);
                }
                None => {
                    let mut set = PostingSet::new();
                    set.insert(doc_id);
                    self.postings.insert(term.to_string(), set);
                }
            }
        }
        self.frequencies.insert(doc_id, frequencies);
    }

    /// `None` when no indexed document contains `term`.
    pub fn postings_for(&self, term: &str) -> Option<&PostingSet> {
        self.postings.get(term)
    }

    pub fn document_frequency(&self, term: &str) -> u64 {
        self.postings.get(term).map_or(0, PostingSet::len)
    }

    pub fn term_frequencies(&self, doc_id: DocId) -> Option<&TermFrequencies> {
        self.frequencies.get(&doc_id)
    }

    /// Number of distinct terms in the index.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn document_count(&self) -> usize {
        self.frequencies.len()
    }
}
