//! Configuration: enumerated options loaded from `<agents-home>/config.yaml`.
//!
//! A missing file yields defaults; a malformed file is fatal
//! (`ConfigInvalid`). Paths resolve relative to the agents-home directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{EngramError, EngramResult};

/// Embedding provider discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Ollama,
    Openai,
}

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingsConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub dimensions: usize,
    pub base_url: String,
    /// Falls back to the `OPENAI_API_KEY` environment variable when unset.
    pub api_key: Option<String>,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            model: "nomic-embed-text".to_string(),
            dimensions: 768,
            base_url: "http://localhost:11434".to_string(),
            api_key: None,
        }
    }
}

impl EmbeddingsConfig {
    /// Resolve the API key from config or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

/// Hybrid search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Weight on the vector side of the fusion; BM25 gets `1 - alpha`.
    pub alpha: f64,
    /// Candidate count requested from each retrieval source.
    pub top_k: usize,
    /// Fused scores below this are dropped.
    pub min_score: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            alpha: 0.7,
            top_k: 20,
            min_score: 0.3,
        }
    }
}

/// Store locations, relative to the agents-home directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub database: PathBuf,
    pub vectors: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("memory/memories.db"),
            vectors: PathBuf::from("memory/vectors.db"),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngramConfig {
    pub embeddings: EmbeddingsConfig,
    pub search: SearchConfig,
    pub paths: PathsConfig,
}

impl EngramConfig {
    /// Load from `<agents_home>/config.yaml`. Missing file means defaults.
    pub fn load(agents_home: &Path) -> EngramResult<Self> {
        let path = agents_home.join("config.yaml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        let config: Self =
            serde_yaml::from_str(&raw).map_err(|e| EngramError::ConfigInvalid {
                reason: format!("{}: {e}", path.display()),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Range and sanity checks on enumerated options.
    pub fn validate(&self) -> EngramResult<()> {
        if !(0.0..=1.0).contains(&self.search.alpha) {
            return Err(EngramError::ConfigInvalid {
                reason: format!("search.alpha must be in [0,1], got {}", self.search.alpha),
            });
        }
        if !(0.0..=1.0).contains(&self.search.min_score) {
            return Err(EngramError::ConfigInvalid {
                reason: format!(
                    "search.min_score must be in [0,1], got {}",
                    self.search.min_score
                ),
            });
        }
        if self.search.top_k == 0 {
            return Err(EngramError::ConfigInvalid {
                reason: "search.top_k must be positive".to_string(),
            });
        }
        if self.embeddings.dimensions == 0 {
            return Err(EngramError::ConfigInvalid {
                reason: "embeddings.dimensions must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Absolute path of the memory database.
    pub fn database_path(&self, agents_home: &Path) -> PathBuf {
        agents_home.join(&self.paths.database)
    }

    /// Absolute path of the vector collection.
    pub fn vectors_path(&self, agents_home: &Path) -> PathBuf {
        agents_home.join(&self.paths.vectors)
    }
}

/// Default agents-home directory: `~/.agents`.
pub fn default_agents_home() -> EngramResult<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join(".agents"))
        .ok_or(EngramError::ConfigMissing {
            path: "~/.agents (no home directory)".to_string(),
        })
}
