//! OpenAI-compatible embeddings: `POST {base_url}/embeddings` with bearer
//! auth; the vector arrives in `data[0].embedding`.

use serde::{Deserialize, Serialize};

use engram_core::errors::{EmbeddingError, EngramError, EngramResult};
use engram_core::traits::{Embedding, EmbeddingProvider};

use crate::hash::content_hash;

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    data: Vec<OpenAiDatum>,
}

#[derive(Deserialize)]
struct OpenAiDatum {
    embedding: Vec<f32>,
}

/// OpenAI-compatible embedding backend. The key resolves from config or the
/// `OPENAI_API_KEY` environment variable; it is checked at call time so a
/// missing key degrades the save rather than failing construction.
pub struct OpenAiProvider {
    model: String,
    base_url: String,
    api_key: Option<String>,
    dimensions: usize,
    client: reqwest::blocking::Client,
}

impl OpenAiProvider {
    pub fn new(config: &engram_core::config::EmbeddingsConfig) -> Self {
        Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.resolve_api_key(),
            dimensions: config.dimensions,
            client: super::http_client(),
        }
    }
}

impl EmbeddingProvider for OpenAiProvider {
    fn embed(&self, text: &str) -> EngramResult<Embedding> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(EngramError::Embedding(EmbeddingError::AuthMissing {
                provider: "openai".to_string(),
            }));
        };

        let url = format!("{}/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&OpenAiRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .map_err(|e| super::transport_err("openai", e))?;

        if !response.status().is_success() {
            return Err(super::protocol_err(
                "openai",
                format!("unexpected status {}", response.status()),
            ));
        }

        let body: OpenAiResponse = response
            .json()
            .map_err(|e| super::protocol_err("openai", e.to_string()))?;

        let vector = body
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| super::protocol_err("openai", "empty data array"))?;

        Ok(Embedding {
            vector,
            content_hash: content_hash(text),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "openai"
    }
}
