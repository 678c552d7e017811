//! Reads Wikipedia-abstract style XML feeds into documents.
//!
//! ```xml
//! <feed>
//!   <doc>
//!     <title>Wikipedia: Rust</title>
//!     <url>https://en.wikipedia.org/wiki/Rust</url>
//!     <abstract>Rust is an iron oxide.</abstract>
//!     <links>...</links>
//!   </doc>
//! </feed>
//! ```
//!
//! Only the `title`, `url` and `abstract` children of each `doc` are read.

use crate::document::{NewDocument, RawDocument};
use crate::error::{Error, Result};
use crate::index::SearchIndex;
use crate::tokenizer::{StopWords, Tokenizer};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Url,
    Abstract,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"url" => Some(Field::Url),
            b"abstract" => Some(Field::Abstract),
            _ => None,
        }
    }

    fn slot<'a>(&self, raw: &'a mut RawDocument) -> &'a mut Option<String> {
        match self {
            Field::Title => &mut raw.title,
            Field::Url => &mut raw.url,
            Field::Abstract => &mut raw.abstract_text,
        }
    }
}

struct OpenDoc {
    raw: RawDocument,
    depth: usize,
    field: Option<Field>,
}

impl OpenDoc {
    fn push_text(&mut self, text: &str) {
        let Some(field) = self.field else { return };
        field.slot(&mut self.raw).get_or_insert_with(String::new).push_str(text);
    }
}

/// Parse every `<doc>` in `reader`, in document order.
pub fn parse_documents<R: BufRead>(reader: R) -> Result<Vec<NewDocument>> {
    // Text is kept untrimmed so pieces split by comments or CDATA join as written.
    let mut xml = Reader::from_reader(reader);

    let mut docs = Vec::new();
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut open: Option<OpenDoc> = None;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(e) => {
                depth += 1;
                let name = e.local_name();
                match open.as_mut() {
                    None if name.as_ref() == b"doc" => {
                        open = Some(OpenDoc { raw: RawDocument::default(), depth, field: None });
                    }
                    Some(doc) if depth == doc.depth + 1 => {
                        doc.field = Field::from_name(name.as_ref());
                        if let Some(field) = doc.field {
                            *field.slot(&mut doc.raw) = Some(String::new());
                        }
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                let name = e.local_name();
                match open.as_mut() {
                    None if name.as_ref() == b"doc" => {
                        docs.push(finish(RawDocument::default(), docs.len())?);
                    }
                    Some(doc) if depth == doc.depth => {
                        if let Some(field) = Field::from_name(name.as_ref()) {
                            *field.slot(&mut doc.raw) = Some(String::new());
                        }
                    }
                    _ => {}
                }
            }
            Event::Text(e) => {
                if let Some(doc) = open.as_mut() {
                    doc.push_text(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(doc) = open.as_mut() {
                    doc.push_text(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                if let Some(doc) = open.as_mut() {
                    if depth == doc.depth + 1 {
                        doc.field = None;
                    } else if depth == doc.depth {
                        if let Some(doc) = open.take() {
                            docs.push(finish(doc.raw, docs.len())?);
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(docs)
}

fn finish(raw: RawDocument, position: usize) -> Result<NewDocument> {
    NewDocument::try_from(raw).map_err(|e| match e {
        Error::InvalidDocument(msg) => Error::InvalidDocument(format!("doc #{}: {msg}", position + 1)),
        other => other,
    })
}

/// Parse one XML file.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<NewDocument>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let docs = parse_documents(BufReader::new(file))?;
    tracing::info!(path = %path.display(), docs = docs.len(), "loaded corpus file");
    Ok(docs)
}

/// Parse a single file, or every `.xml` file under a directory in file-name order.
pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Vec<NewDocument>> {
    let path = path.as_ref();
    if !path.is_dir() {
        return load_file(path);
    }
    let mut docs = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        let p = entry.path();
        if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("xml") {
            docs.extend(load_file(p)?);
        }
    }
    Ok(docs)
}

/// Load the corpus at `corpus` and index it, using the stop-word file at
/// `stop_words` (one word per line) in place of the built-in list when given.
pub fn build_index(corpus: &Path, stop_words: Option<&Path>) -> Result<SearchIndex> {
    let tokenizer = match stop_words {
        Some(path) => Tokenizer::with_stop_words(StopWords::from_reader(BufReader::new(File::open(path)?))?),
        None => Tokenizer::new(),
    };
    let docs = load_path(corpus)?;
    let mut index = SearchIndex::with_tokenizer(tokenizer);
    index.index_all(docs);
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_direct_children_only() {
        let xml = r#"<feed><doc>
            <title>Wikipedia: Cat</title>
            <url>https://en.wikipedia.org/wiki/Cat</url>
            <abstract>The cat is a small carnivorous mammal.</abstract>
            <links><sublink linktype="nav"><anchor>Taxonomy</anchor><link>https://x</link></sublink></links>
        </doc></feed>"#;
        let docs = parse_documents(xml.as_bytes()).unwrap();
        assert_eq!(docs, vec![NewDocument::new(
            "Wikipedia: Cat",
            "https://en.wikipedia.org/wiki/Cat",
            "The cat is a small carnivorous mammal.",
        )]);
    }

    #[test]
    fn self_closing_fields_are_empty() {
        let xml = "<feed><doc><title>T</title><url>u</url><abstract/></doc></feed>";
        let docs = parse_documents(xml.as_bytes()).unwrap();
        assert_eq!(docs[0].abstract_text, "");
    }

    #[test]
    fn entities_and_cdata_are_decoded() {
        let xml = "<feed><doc><title>A &amp; B</title><url>u</url><abstract><![CDATA[x < y]]></abstract></doc></feed>";
        let docs = parse_documents(xml.as_bytes()).unwrap();
        assert_eq!(docs[0].title, "A & B");
        assert_eq!(docs[0].abstract_text, "x < y");
    }

    #[test]
    fn split_text_joins_as_written() {
        let xml = "<feed><doc><title>foo<!-- c -->bar</title><url>u</url><abstract>x<![CDATA[y]]>z</abstract></doc></feed>";
        let docs = parse_documents(xml.as_bytes()).unwrap();
        assert_eq!(docs[0].title, "foobar");
        assert_eq!(docs[0].abstract_text, "xyz");
    }

    #[test]
    fn nested_markup_keeps_source_spacing() {
        let xml = "<feed><doc><title>T</title><url>u</url><abstract>a <b>bold</b> c</abstract></doc></feed>";
        let docs = parse_documents(xml.as_bytes()).unwrap();
        assert_eq!(docs[0].abstract_text, "a bold c");
    }

    #[test]
    fn missing_field_is_invalid() {
        let xml = "<feed><doc><title>ok</title><url>u</url><abstract>a</abstract></doc><doc><title>T</title><abstract>a</abstract></doc></feed>";
        let err = parse_documents(xml.as_bytes()).unwrap_err();
        match err {
            Error::InvalidDocument(msg) => {
                assert!(msg.contains("doc #2"));
                assert!(msg.contains("url"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mismatched_tags_are_an_xml_error() {
        let xml = "<feed><doc><title>T</url></doc></feed>";
        assert!(matches!(parse_documents(xml.as_bytes()), Err(Error::Xml(_))));
    }
}
