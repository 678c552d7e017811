use thiserror::Error;

/// Errors raised at the boundaries of the index: building documents from raw
/// input and reading a corpus. Tokenizing, indexing and searching never fail.
#[derive(Debug, Error)]
pub enum Error {
    /// A document record is missing a required textual field.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("malformed corpus XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn missing_field(field: &str) -> Self {
        Error::InvalidDocument(format!("missing required field `{field}`"))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
