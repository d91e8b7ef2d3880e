/// Errors from embedding providers.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("provider {provider} unavailable: {message}")]
    ProviderUnavailable { provider: String, message: String },

    #[error("provider {provider} requires an API key (set embeddings.api_key or OPENAI_API_KEY)")]
    AuthMissing { provider: String },

    #[error("provider {provider} protocol error: {message}")]
    ProtocolError { provider: String, message: String },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
