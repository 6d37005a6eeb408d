//! In-memory backend client for tests and development.
//!
//! Stores bags in a process-local map behind an async lock. Useful for unit
//! and integration tests of the store and as a stand-in while no Vault server
//! is available. Not for production: nothing is persisted or encrypted.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::client::KvClient;
use super::types::OptionBag;
use crate::errors::Result;

/// Process-local [`KvClient`] implementation.
#[derive(Debug, Default)]
pub struct MemoryKvClient {
    paths: RwLock<HashMap<String, OptionBag>>,
}

impl MemoryKvClient {
    /// Creates an empty in-memory client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a bag directly at a raw path, bypassing the handler layer.
    pub async fn put(&self, path: &str, bag: OptionBag) {
        self.paths.write().await.insert(path.to_string(), bag);
    }

    /// Inspect the raw bag stored at a path, envelope and all.
    pub async fn stored_at(&self, path: &str) -> Option<OptionBag> {
        self.paths.read().await.get(path).cloned()
    }

    /// Number of distinct paths currently holding data.
    pub async fn path_count(&self) -> usize {
        self.paths.read().await.len()
    }
}

#[async_trait]
impl KvClient for MemoryKvClient {
    async fn read_by_path(&self, path: &str) -> Result<Option<OptionBag>> {
        Ok(self.paths.read().await.get(path).cloned())
    }

    async fn write_by_path(&self, path: &str, bag: &OptionBag) -> Result<()> {
        self.paths.write().await.insert(path.to_string(), bag.clone());
        Ok(())
    }
}
