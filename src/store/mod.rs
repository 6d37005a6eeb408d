//! Option store core.
//!
//! Reconciles the two wire formats of the KV secrets engine (v1 and v2),
//! maps logical keyspaces to opaque backend paths through a rename table, and
//! merges partial updates over the current bag so a write never destroys
//! sibling keys.
//!
//! # Architecture
//!
//! ```text
//! OptionHolder façade (holder.rs, cached.rs)
//!        → KvEngineVersion read/write strategies (handler.rs)
//!        → KeySpacePaths resolver (paths.rs)
//!        → KvClient port (client.rs) → external backend
//! ```
//!
//! The store is fully decoupled from transport and auth: everything below the
//! [`KvClient`] port belongs to an adapter such as
//! [`VaultHttpClient`](crate::vault::VaultHttpClient).
//!
//! # Example
//!
//! ```rust,ignore
//! use optvault::store::{KvEngineVersion, KeySpacePaths, OptionHolder, VaultOptionHolder};
//! use optvault::vault::VaultHttpClient;
//!
//! let client = VaultHttpClient::new(settings.clone())?;
//! let holder = VaultOptionHolder::new(
//!     client,
//!     "app",
//!     settings.engine_version,
//!     KeySpacePaths::new(settings.mount_path.clone(), settings.keyspace_map.clone()),
//! );
//!
//! let outcome = holder.set_option_value("rate", 0.07.into(), Some("billing")).await;
//! let rate = holder.option_value("rate", Some("billing")).await?;
//! ```

pub mod cached;
pub mod client;
pub mod handler;
pub mod holder;
pub mod memory;
pub mod paths;
pub mod types;

pub use cached::CachedOptionHolder;
pub use client::KvClient;
pub use handler::KvEngineVersion;
pub use holder::{OptionHolder, VaultOptionHolder};
pub use memory::MemoryKvClient;
pub use paths::{KeySpaceMap, KeySpacePaths};
pub use types::{OptionBag, SecretString, WriteOutcome};
