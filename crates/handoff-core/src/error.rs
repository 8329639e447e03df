use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Rule index {index} out of range ({len} rules)")]
    RuleIndex { index: usize, len: usize },

    #[error("Catalog index {index} out of range ({len} entries)")]
    CatalogIndex { index: usize, len: usize },

    #[error("Duplicate catalog identity: {0}")]
    DuplicateIdentity(String),

    #[error("Invalid settings document: {0}")]
    InvalidDocument(String),

    #[error("Settings store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, Error>;
