//! Option store façade.
//!
//! [`OptionHolder`] is the contract the hosting application codes against;
//! [`VaultOptionHolder`] is the Vault-backed implementation. Decorators (see
//! `store::cached`) wrap the trait without the inner holder knowing.
//!
//! The read path is fail-loud: backend failures propagate to the caller
//! untouched. The write path is fail-soft: `set_option_value` converts any
//! store error from the read-merge-write attempt into a [`WriteOutcome`]
//! instead of raising, so partial configuration writes never crash request
//! handling.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::client::KvClient;
use super::handler::KvEngineVersion;
use super::paths::KeySpacePaths;
use super::types::{OptionBag, WriteOutcome};
use crate::errors::Result;

/// Façade contract for reading and writing options.
#[async_trait]
pub trait OptionHolder: Send + Sync {
    /// The keyspace bound at construction, used when a call site does not
    /// specify one explicitly.
    fn default_keyspace(&self) -> &str;

    /// Fetch one option value from a keyspace.
    ///
    /// `keyspace` falls back to the default when `None` or empty. A missing
    /// keyspace or missing key yields `Ok(None)`, never an error; lower-layer
    /// transport and auth failures propagate as-is.
    async fn option_value(&self, key: &str, keyspace: Option<&str>) -> Result<Option<Value>>;

    /// Fetch one option value, substituting `default` when it is absent.
    async fn option_value_or(
        &self,
        key: &str,
        keyspace: Option<&str>,
        default: Value,
    ) -> Result<Value> {
        Ok(self.option_value(key, keyspace).await?.unwrap_or(default))
    }

    /// Write one option value into a keyspace, merging over the current bag.
    ///
    /// Never raises: any store error from the attempt is reported through
    /// the returned [`WriteOutcome`].
    async fn set_option_value(&self, key: &str, value: Value, keyspace: Option<&str>)
        -> WriteOutcome;
}

/// Vault-backed [`OptionHolder`].
///
/// Constructed once per request or process, bound to one backend client, one
/// engine version, one mount path, and one rename table; it holds no mutable
/// state beyond those bindings and no connection-level resources (those
/// belong to the [`KvClient`] adapter).
///
/// Concurrent `set_option_value` calls on the same holder are serialized per
/// keyspace so their read-merge-write sequences cannot interleave. Writers in
/// other holder instances or processes are not coordinated; their merges can
/// still race (see [`KvEngineVersion::write_keyspace`]).
pub struct VaultOptionHolder<C: KvClient> {
    client: C,
    default_keyspace: String,
    engine: KvEngineVersion,
    paths: KeySpacePaths,
    write_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<C: KvClient> VaultOptionHolder<C> {
    /// Create a holder bound to the given client and keyspace bindings.
    pub fn new(
        client: C,
        default_keyspace: impl Into<String>,
        engine: KvEngineVersion,
        paths: KeySpacePaths,
    ) -> Self {
        Self {
            client,
            default_keyspace: default_keyspace.into(),
            engine,
            paths,
            write_locks: DashMap::new(),
        }
    }

    /// The engine version this holder was bound to.
    pub fn engine(&self) -> KvEngineVersion {
        self.engine
    }

    /// Path resolver bound at construction.
    pub fn paths(&self) -> &KeySpacePaths {
        &self.paths
    }

    /// Read the entire bag for a keyspace (`None` and empty fall back to the
    /// default keyspace).
    pub async fn keyspace_bag(&self, keyspace: Option<&str>) -> Result<Option<OptionBag>> {
        let keyspace = self.effective_keyspace(keyspace);
        self.engine.read_keyspace(&self.client, &self.paths, keyspace).await
    }

    fn effective_keyspace<'a>(&'a self, keyspace: Option<&'a str>) -> &'a str {
        match keyspace {
            Some(ks) if !ks.is_empty() => ks,
            _ => &self.default_keyspace,
        }
    }

    fn write_lock(&self, keyspace: &str) -> Arc<Mutex<()>> {
        self.write_locks
            .entry(keyspace.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[async_trait]
impl<C: KvClient> OptionHolder for VaultOptionHolder<C> {
    fn default_keyspace(&self) -> &str {
        &self.default_keyspace
    }

    async fn option_value(&self, key: &str, keyspace: Option<&str>) -> Result<Option<Value>> {
        let keyspace = self.effective_keyspace(keyspace);
        let bag = self.engine.read_keyspace(&self.client, &self.paths, keyspace).await?;
        Ok(bag.and_then(|bag| bag.get(key).cloned()))
    }

    async fn set_option_value(
        &self,
        key: &str,
        value: Value,
        keyspace: Option<&str>,
    ) -> WriteOutcome {
        let keyspace = self.effective_keyspace(keyspace).to_string();

        let mut partial = OptionBag::new();
        partial.insert(key.to_string(), value);

        // Serialize concurrent writers to the same keyspace within this
        // holder so their read-merge-write phases cannot interleave.
        let lock = self.write_lock(&keyspace);
        let _guard = lock.lock().await;

        match self.engine.write_keyspace(&self.client, &self.paths, &keyspace, partial).await {
            Ok(()) => {
                debug!(key = %key, keyspace = %keyspace, "Option value written");
                WriteOutcome::success()
            }
            Err(e) => {
                warn!(key = %key, keyspace = %keyspace, error = %e, "Option write failed");
                WriteOutcome::failure(e.to_string())
            }
        }
    }
}
