/// Errors from the ingestion pipeline.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("duplicate memory: {summary}")]
    DuplicateMemory { summary: String },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}
