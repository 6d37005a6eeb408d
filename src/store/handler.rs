//! Versioned read/write handlers for the KV engine.
//!
//! The two wire formats of the secrets engine ("1" and "2") are interchangeable
//! strategies selected once per store. V1 stores the option bag directly at
//! the keyspace path; V2 nests it one level deeper under a `data` envelope
//! field and addresses it through the mount's `data/` sub-path. Both share the
//! same merge-on-write semantics: a partial update is merged over the current
//! full bag before writing, so sibling keys are never destroyed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::KvClient;
use super::paths::KeySpacePaths;
use super::types::OptionBag;
use crate::errors::Result;

/// Field under which KV v2 nests the stored bag.
const ENVELOPE_FIELD: &str = "data";

/// KV secrets-engine version, fixed per store instance.
///
/// Selected once at construction and dispatched as a closed enum; there is no
/// dynamic strategy lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KvEngineVersion {
    /// KV version 1: the bag is stored directly at `{mount}/{segment}`.
    V1,
    /// KV version 2: the bag is wrapped under `data` at
    /// `{mount}/data/{segment}`.
    V2,
}

impl KvEngineVersion {
    /// Short identifier as used in configuration ("1" or "2").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1 => "1",
            Self::V2 => "2",
        }
    }

    /// Read the full option bag for a keyspace.
    ///
    /// Returns `Ok(None)` when nothing is stored for the keyspace, or (V2)
    /// when the stored envelope has no usable `data` field.
    pub async fn read_keyspace<C>(
        &self,
        client: &C,
        paths: &KeySpacePaths,
        keyspace: &str,
    ) -> Result<Option<OptionBag>>
    where
        C: KvClient + ?Sized,
    {
        let path = paths.path_for(keyspace, *self);
        debug!(keyspace = %keyspace, path = %path, engine = %self, "Reading keyspace");

        let stored = client.read_by_path(&path).await?;
        match self {
            Self::V1 => Ok(stored),
            Self::V2 => Ok(stored.and_then(unwrap_envelope)),
        }
    }

    /// Merge a partial bag into a keyspace and write the result back.
    ///
    /// Reads the current full bag first (absent data counts as an empty bag),
    /// overwrites/inserts every key from `partial` (shallow merge, last
    /// writer wins per key, all other existing keys preserved), then writes
    /// the merged bag to the keyspace path. V2 re-wraps the merged bag under
    /// the `data` envelope before writing.
    ///
    /// The read-then-write sequence is strictly ordered but not isolated
    /// across store instances or processes: two concurrent writers to the
    /// same keyspace can base their merges on stale reads and clobber each
    /// other's non-overlapping keys. The backend contract offers no
    /// compare-and-swap token; within a single [`VaultOptionHolder`] the
    /// façade serializes writers per keyspace (see `store::holder`).
    ///
    /// [`VaultOptionHolder`]: crate::store::VaultOptionHolder
    pub async fn write_keyspace<C>(
        &self,
        client: &C,
        paths: &KeySpacePaths,
        keyspace: &str,
        partial: OptionBag,
    ) -> Result<()>
    where
        C: KvClient + ?Sized,
    {
        let mut merged = self.read_keyspace(client, paths, keyspace).await?.unwrap_or_default();
        for (key, value) in partial {
            merged.insert(key, value);
        }

        let path = paths.path_for(keyspace, *self);
        debug!(
            keyspace = %keyspace,
            path = %path,
            engine = %self,
            keys = merged.len(),
            "Writing merged keyspace bag"
        );

        match self {
            Self::V1 => client.write_by_path(&path, &merged).await,
            Self::V2 => {
                let mut envelope = OptionBag::new();
                envelope.insert(ENVELOPE_FIELD.to_string(), serde_json::Value::Object(merged));
                client.write_by_path(&path, &envelope).await
            }
        }
    }
}

/// Unwrap the KV v2 envelope: the stored bag lives under the `data` field.
///
/// A missing field or a non-object value counts as "no data".
fn unwrap_envelope(envelope: OptionBag) -> Option<OptionBag> {
    match envelope.get(ENVELOPE_FIELD) {
        Some(serde_json::Value::Object(bag)) => Some(bag.clone()),
        _ => None,
    }
}

impl fmt::Display for KvEngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_str())
    }
}

impl FromStr for KvEngineVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "1" | "v1" => Ok(Self::V1),
            "2" | "v2" => Ok(Self::V2),
            _ => Err(format!("Unknown KV engine version: {}", s)),
        }
    }
}
