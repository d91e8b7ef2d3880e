//! Embedding provider implementations, one module per backend.

pub mod ollama;
pub mod openai;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

use std::time::Duration;

use engram_core::config::{EmbeddingsConfig, ProviderKind};
use engram_core::constants::EMBED_TIMEOUT_SECS;
use engram_core::errors::{EmbeddingError, EngramError};
use engram_core::traits::EmbeddingProvider;

/// Build the configured provider.
pub fn create_provider(config: &EmbeddingsConfig) -> Box<dyn EmbeddingProvider> {
    match config.provider {
        ProviderKind::Ollama => Box::new(OllamaProvider::new(config)),
        ProviderKind::Openai => Box::new(OpenAiProvider::new(config)),
    }
}

/// Blocking HTTP client with the 30 s embedding ceiling.
pub(crate) fn http_client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(EMBED_TIMEOUT_SECS))
        .build()
        .unwrap_or_default()
}

/// Classify a transport error: connect/timeout failures mean the provider is
/// unreachable; anything else is a protocol problem.
pub(crate) fn transport_err(provider: &str, e: reqwest::Error) -> EngramError {
    if e.is_connect() || e.is_timeout() {
        EngramError::Embedding(EmbeddingError::ProviderUnavailable {
            provider: provider.to_string(),
            message: e.to_string(),
        })
    } else {
        EngramError::Embedding(EmbeddingError::ProtocolError {
            provider: provider.to_string(),
            message: e.to_string(),
        })
    }
}

/// Non-2xx responses and malformed bodies are protocol errors.
pub(crate) fn protocol_err(provider: &str, message: impl Into<String>) -> EngramError {
    EngramError::Embedding(EmbeddingError::ProtocolError {
        provider: provider.to_string(),
        message: message.into(),
    })
}
