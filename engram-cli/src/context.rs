//! Shared command context: resolved paths and lazily opened stores.

use std::path::PathBuf;

use anyhow::Context;

use engram_core::config::EngramConfig;
use engram_embeddings::EmbeddingEngine;
use engram_storage::MemoryStore;
use engram_vector::VectorStore;

pub struct AppContext {
    pub agents_home: PathBuf,
    pub config: EngramConfig,
}

impl AppContext {
    pub fn new(agents_home: PathBuf, config: EngramConfig) -> Self {
        Self {
            agents_home,
            config,
        }
    }

    /// Open the relational store (running pending built-in migrations).
    pub fn open_store(&self) -> anyhow::Result<MemoryStore> {
        let path = self.config.database_path(&self.agents_home);
        MemoryStore::open(&path)
            .with_context(|| format!("opening memory store at {}", path.display()))
    }

    /// Handle to the vector collection. Opening is lazy; unavailability is
    /// handled by each caller.
    pub fn vector_store(&self) -> VectorStore {
        VectorStore::new(
            &self.config.vectors_path(&self.agents_home),
            self.config.embeddings.dimensions,
            self.config.embeddings.model.clone(),
        )
    }

    /// The configured embedding engine.
    pub fn embedding_engine(&self) -> EmbeddingEngine {
        EmbeddingEngine::from_config(&self.config.embeddings)
    }

    /// Location of the working-memory document.
    pub fn memory_md_path(&self) -> PathBuf {
        self.agents_home.join("memory").join("MEMORY.md")
    }
}
