use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("no entries exist")]
    Empty,
    /// Reserved: `save` is an upsert and never rejects a known id.
    #[error("entry already exists: {0}")]
    AlreadyExists(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("external source error: {0}")]
    External(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}
