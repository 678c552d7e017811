use crate::document::{DocId, SearchHit};
use crate::index::SearchIndex;
use crate::postings::PostingSet;

/// What to do with a query term that no indexed document contains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnseenTerms {
    /// Ignore the term; the query becomes an AND over the terms the corpus knows.
    /// A query made only of unseen terms matches nothing.
    #[default]
    Skip,
    /// Any unseen term empties the result.
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub unseen_terms: UnseenTerms,
    /// Keep at most this many hits after ranking.
    pub limit: Option<usize>,
}

impl QueryOptions {
    pub fn strict() -> Self {
        Self { unseen_terms: UnseenTerms::Strict, ..Self::default() }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Boolean AND retrieval with TF-IDF ranking over a [`SearchIndex`].
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    index: &'a SearchIndex,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self { index }
    }

    pub fn search(&self, query: &str) -> Vec<SearchHit<'a>> {
        self.search_with(query, &QueryOptions::default())
    }

    pub fn search_with(&self, query: &str, options: &QueryOptions) -> Vec<SearchHit<'a>> {
        let index: &'a SearchIndex = self.index;
        let terms = index.tokenizer().tokenize(query);
        let postings = index.postings();

        let mut sets: Vec<&PostingSet> = Vec::with_capacity(terms.len());
        for term in &terms {
            match postings.postings_for(term) {
                Some(set) => sets.push(set),
                None if options.unseen_terms == UnseenTerms::Strict => {
                    tracing::debug!(term = %term, "unseen term in strict query");
                    return Vec::new();
                }
                None => {}
            }
        }

        let matched = PostingSet::intersect_all(&sets);
        let mut hits: Vec<SearchHit<'a>> = matched
            .iter()
            .filter_map(|id| {
                let document = index.get(id)?;
                Some(SearchHit { document, score: self.score(&terms, id) })
            })
            .collect();

        // Stable: equal scores stay in ascending id order.
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        if let Some(limit) = options.limit {
            hits.truncate(limit);
        }
        tracing::debug!(terms = terms.len(), sets = sets.len(), hits = hits.len(), "search");
        hits
    }

    /// Posting set for one raw word, normalized without full tokenization.
    pub fn lookup_word(&self, word: &str) -> Option<&'a PostingSet> {
        let index: &'a SearchIndex = self.index;
        let term = index.tokenizer().normalize_one(word)?;
        index.postings().postings_for(&term)
    }

    /// `log10(N / df)` for a normalized term; `None` when the term is not indexed.
    pub fn idf(&self, term: &str) -> Option<f64> {
        let df = self.index.postings().document_frequency(term);
        if df == 0 {
            return None;
        }
        Some((self.index.len() as f64 / df as f64).log10())
    }

    /// Sum of `tf * idf` over the query terms, repeated terms counted each time.
    fn score(&self, terms: &[String], doc_id: DocId) -> f64 {
        let Some(frequencies) = self.index.postings().term_frequencies(doc_id) else {
            return 0.0;
        };
        terms
            .iter()
            .filter_map(|term| {
                let tf = frequencies.get(term)?;
                Some(tf as f64 * self.idf(term)?)
            })
            .sum()
    }
}
