//! Error taxonomy for the Engram memory system.
//!
//! Subsystem errors live in their own enums and convert into the top-level
//! [`EngramError`] via `From` impls.

mod embedding_error;
mod ingest_error;
mod storage_error;
mod vector_error;

pub use embedding_error::EmbeddingError;
pub use ingest_error::IngestError;
pub use storage_error::StorageError;
pub use vector_error::VectorError;

/// Top-level error type for the Engram memory system.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    #[error("config file missing: {path}")]
    ConfigMissing { path: String },

    #[error("invalid config: {reason}")]
    ConfigInvalid { reason: String },

    #[error("memory not found: {id}")]
    MemoryNotFound { id: String },

    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("vector store error: {0}")]
    Vector(#[from] VectorError),

    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {message}")]
    Io { message: String },
}

impl From<std::io::Error> for EngramError {
    fn from(e: std::io::Error) -> Self {
        EngramError::Io {
            message: e.to_string(),
        }
    }
}

/// Convenience type alias.
pub type EngramResult<T> = Result<T, EngramError>;
