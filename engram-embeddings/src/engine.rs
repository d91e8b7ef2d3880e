//! EmbeddingEngine — the main entry point for engram-embeddings.
//!
//! Wraps the configured provider with input normalization and dimension
//! validation, and exposes a status probe. Implements `EmbeddingProvider`
//! so it can be used anywhere a provider is expected.

use serde::Serialize;
use tracing::debug;

use engram_core::config::EmbeddingsConfig;
use engram_core::errors::{EmbeddingError, EngramError, EngramResult, IngestError};
use engram_core::traits::{Embedding, EmbeddingProvider};

use crate::providers;

/// The main embedding engine.
pub struct EmbeddingEngine {
    provider: Box<dyn EmbeddingProvider>,
    dimensions: usize,
    model: String,
    base_url: String,
}

impl EmbeddingEngine {
    /// Create an engine from configuration; the provider variant is chosen
    /// by `embeddings.provider`.
    pub fn from_config(config: &EmbeddingsConfig) -> Self {
        let provider = providers::create_provider(config);
        debug!(
            provider = provider.name(),
            dims = config.dimensions,
            "EmbeddingEngine initialized"
        );
        Self {
            provider,
            dimensions: config.dimensions,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Wrap an arbitrary provider (for tests and custom backends).
    pub fn with_provider(provider: Box<dyn EmbeddingProvider>, dimensions: usize) -> Self {
        Self {
            provider,
            dimensions,
            model: String::new(),
            base_url: String::new(),
        }
    }

    /// Probe the provider by embedding a short literal.
    pub fn status(&self) -> ProviderStatus {
        let mut status = ProviderStatus {
            provider: self.provider.name().to_string(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            available: false,
            dimensions: None,
            error: None,
        };
        match self.embed("test") {
            Ok(embedding) => {
                status.available = true;
                status.dimensions = Some(embedding.vector.len());
            }
            Err(e) => {
                status.error = Some(e.to_string());
            }
        }
        status
    }
}

impl EmbeddingProvider for EmbeddingEngine {
    /// Embed a text: trim, reject empty, delegate, validate dimensions.
    fn embed(&self, text: &str) -> EngramResult<Embedding> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(EngramError::Ingest(IngestError::InvalidInput {
                reason: "cannot embed empty text".to_string(),
            }));
        }

        let embedding = self.provider.embed(trimmed)?;

        if embedding.vector.len() != self.dimensions {
            return Err(EngramError::Embedding(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.vector.len(),
            }));
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}

/// Result of the provider status probe.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::content_hash;

    /// Deterministic stub: vector of `dims` constants.
    struct StubProvider {
        dims: usize,
        emit_dims: usize,
    }

    impl EmbeddingProvider for StubProvider {
        fn embed(&self, text: &str) -> EngramResult<Embedding> {
            Ok(Embedding {
                vector: vec![0.5; self.emit_dims],
                content_hash: content_hash(text),
            })
        }

        fn dimensions(&self) -> usize {
            self.dims
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    #[test]
    fn trims_before_hashing() {
        let engine =
            EmbeddingEngine::with_provider(Box::new(StubProvider { dims: 4, emit_dims: 4 }), 4);
        let a = engine.embed("  hello world  ").unwrap();
        let b = engine.embed("hello world").unwrap();
        assert_eq!(a.content_hash, b.content_hash);
    }

    #[test]
    fn empty_input_is_invalid() {
        let engine =
            EmbeddingEngine::with_provider(Box::new(StubProvider { dims: 4, emit_dims: 4 }), 4);
        assert!(engine.embed("   ").is_err());
    }

    #[test]
    fn wrong_dimensions_are_rejected() {
        let engine =
            EmbeddingEngine::with_provider(Box::new(StubProvider { dims: 4, emit_dims: 3 }), 4);
        let err = engine.embed("hello").unwrap_err();
        assert!(matches!(
            err,
            EngramError::Embedding(EmbeddingError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn status_reports_probe_outcome() {
        let engine =
            EmbeddingEngine::with_provider(Box::new(StubProvider { dims: 4, emit_dims: 4 }), 4);
        let status = engine.status();
        assert!(status.available);
        assert_eq!(status.dimensions, Some(4));

        let broken =
            EmbeddingEngine::with_provider(Box::new(StubProvider { dims: 4, emit_dims: 7 }), 4);
        let status = broken.status();
        assert!(!status.available);
        assert!(status.error.is_some());
    }
}
