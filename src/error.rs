//! Error types for rotten-erp.

use thiserror::Error;

use crate::model::Collection;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },

    /// The stored value is not valid UTF-8 or not a valid aggregate.
    #[error("stored data is corrupt: {0}")]
    Corrupt(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
