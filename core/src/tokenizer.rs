use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::io::{self, BufRead};

/// Stop words used when no other list is configured.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have",
    "I", "it", "for", "not", "on", "with", "he", "as", "you",
    "do", "at", "this", "but", "his", "by", "from", "wikipedia",
];

lazy_static! {
    // Anything outside the ASCII word class is dropped, no Unicode word segmentation.
    static ref NON_WORD: Regex = Regex::new(r"[^A-Za-z0-9_]").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// A case-normalized stop-word set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn english() -> Self {
        Self::new(DEFAULT_STOP_WORDS.iter().copied())
    }

    /// One word per line; blank lines and lines starting with `#` are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let mut words = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            words.push(line.to_string());
        }
        Ok(Self::new(words))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Turns raw text into index terms: lowercase, strip non-word characters,
/// drop stop words, then apply the Snowball English stemmer.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stop_words: StopWords,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::with_stop_words(StopWords::english())
    }

    pub fn with_stop_words(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    /// Normalize a single word. `None` when nothing of it survives or it is a stop word.
    pub fn normalize_one(&self, word: &str) -> Option<String> {
        let lowered = word.to_lowercase();
        let stripped = NON_WORD.replace_all(&lowered, "");
        if stripped.is_empty() || self.stop_words.contains(&stripped) {
            return None;
        }
        // Words this short are left as they are.
        if stripped.len() <= 2 {
            return Some(stripped.into_owned());
        }
        Some(STEMMER.stem(&stripped).into_owned())
    }

    /// Split on whitespace and normalize every word, keeping input order.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .filter_map(|word| self.normalize_one(word))
            .collect()
    }
}
