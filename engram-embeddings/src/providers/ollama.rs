//! Ollama embeddings: `POST {base_url}/api/embeddings` with
//! `{model, prompt}`; the response carries a float array in `embedding`.

use serde::{Deserialize, Serialize};

use engram_core::errors::EngramResult;
use engram_core::traits::{Embedding, EmbeddingProvider};

use crate::hash::content_hash;

#[derive(Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct OllamaResponse {
    embedding: Vec<f32>,
}

/// Local Ollama embedding backend.
pub struct OllamaProvider {
    model: String,
    base_url: String,
    dimensions: usize,
    client: reqwest::blocking::Client,
}

impl OllamaProvider {
    pub fn new(config: &engram_core::config::EmbeddingsConfig) -> Self {
        Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            dimensions: config.dimensions,
            client: super::http_client(),
        }
    }
}

impl EmbeddingProvider for OllamaProvider {
    fn embed(&self, text: &str) -> EngramResult<Embedding> {
        let url = format!("{}/api/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&OllamaRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .map_err(|e| super::transport_err("ollama", e))?;

        if !response.status().is_success() {
            return Err(super::protocol_err(
                "ollama",
                format!("unexpected status {}", response.status()),
            ));
        }

        let body: OllamaResponse = response
            .json()
            .map_err(|e| super::protocol_err("ollama", e.to_string()))?;

        Ok(Embedding {
            vector: body.embedding,
            content_hash: content_hash(text),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
