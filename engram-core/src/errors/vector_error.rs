/// Errors from the on-disk vector collection.
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    #[error("vector store unavailable: {message}")]
    Unavailable { message: String },

    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
