use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type DocId = u32;

/// Characters of the abstract kept by [`SearchHit::summary`].
const SUMMARY_ABSTRACT_CHARS: usize = 100;

/// A document as stored in the index. Immutable once inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub title: String,
    pub url: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl Document {
    /// Title and abstract joined by a space; this is what gets tokenized.
    pub fn full_text(&self) -> String {
        full_text(&self.title, &self.abstract_text)
    }
}

/// A validated document that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub url: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl NewDocument {
    pub fn new(title: impl Into<String>, url: impl Into<String>, abstract_text: impl Into<String>) -> Self {
        Self { title: title.into(), url: url.into(), abstract_text: abstract_text.into() }
    }

    pub fn full_text(&self) -> String {
        full_text(&self.title, &self.abstract_text)
    }

    pub(crate) fn into_document(self, id: DocId) -> Document {
        Document { id, title: self.title, url: self.url, abstract_text: self.abstract_text }
    }
}

fn full_text(title: &str, abstract_text: &str) -> String {
    let mut text = String::with_capacity(title.len() + abstract_text.len() + 1);
    text.push_str(title);
    text.push(' ');
    text.push_str(abstract_text);
    text
}

/// Document fields as they arrive from an upstream source, any of which may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocument {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
}

impl TryFrom<RawDocument> for NewDocument {
    type Error = Error;

    fn try_from(raw: RawDocument) -> Result<Self> {
        let title = raw.title.ok_or_else(|| Error::missing_field("title"))?;
        let url = raw.url.ok_or_else(|| Error::missing_field("url"))?;
        let abstract_text = raw.abstract_text.ok_or_else(|| Error::missing_field("abstract"))?;
        Ok(NewDocument { title, url, abstract_text })
    }
}

/// A ranked result borrowing its document from the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub document: &'a Document,
    pub score: f64,
}

impl<'a> SearchHit<'a> {
    pub fn into_owned(self) -> ScoredDocument {
        ScoredDocument { document: self.document.clone(), score: self.score }
    }

    /// Title, score and an abstract cut to 100 characters.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SearchHit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Title: {}\nScore: {:.6}\nAbstract: {}\n",
            self.document.title,
            self.score,
            truncate_abstract(&self.document.abstract_text)
        )
    }
}

/// A ranked result that owns its document, used where no index borrow can be held.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f64,
}

impl ScoredDocument {
    pub fn as_hit(&self) -> SearchHit<'_> {
        SearchHit { document: &self.document, score: self.score }
    }
}

fn truncate_abstract(text: &str) -> String {
    match text.char_indices().nth(SUMMARY_ABSTRACT_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_text_joins_title_and_abstract() {
        let doc = NewDocument::new("Rust", "https://example.com", "A systems language").into_document(1);
        assert_eq!(doc.full_text(), "Rust A systems language");
    }

    #[test]
    fn raw_document_requires_every_field() {
        let raw = RawDocument { title: Some("t".into()), url: None, abstract_text: Some("a".into()) };
        let err = NewDocument::try_from(raw).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(ref m) if m.contains("url")));

        let raw = RawDocument { title: Some("t".into()), url: Some("u".into()), abstract_text: Some(String::new()) };
        assert_eq!(NewDocument::try_from(raw).unwrap(), NewDocument::new("t", "u", ""));
    }

    #[test]
    fn summary_truncates_long_abstracts() {
        let doc = NewDocument::new("T", "u", "é".repeat(150)).into_document(7);
        let hit = SearchHit { document: &doc, score: 1.5 };
        let summary = hit.summary();
        assert!(summary.starts_with("Title: T\nScore: 1.500000\n"));
        assert!(summary.contains(&format!("Abstract: {}...", "é".repeat(100))));

        let short = NewDocument::new("T", "u", "short").into_document(8);
        let hit = SearchHit { document: &short, score: 0.0 };
        assert!(hit.summary().ends_with("Abstract: short\n"));
    }
}
