//! # optvault
//!
//! optvault lets an application read and write configuration values
//! ("options") that are physically stored in a HashiCorp Vault KV secrets
//! engine instead of the application's own settings table. It reconciles the
//! two wire formats of the KV engine (v1 and v2), maps logical keyspaces to
//! backend paths through a configurable rename table, and merges partial
//! updates over the current bag so a write never destroys sibling keys.
//!
//! ## Architecture
//!
//! ```text
//! OptionHolder façade → versioned read/write handler → path resolver
//!        → KvClient port → Vault HTTP adapter → Vault server
//! ```
//!
//! The store is decoupled from transport and authentication through the
//! [`KvClient`] port; [`VaultHttpClient`] is the production adapter and
//! [`MemoryKvClient`] a process-local one for tests and development.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use optvault::{
//!     KeySpacePaths, OptionHolder, Result, VaultHttpClient, VaultOptionHolder, VaultSettings,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = VaultSettings::from_env()?;
//!     let paths =
//!         KeySpacePaths::new(settings.mount_path.clone(), settings.keyspace_map.clone());
//!     let engine = settings.engine_version;
//!
//!     let client = VaultHttpClient::new(settings)?;
//!     let holder = VaultOptionHolder::new(client, "app", engine, paths);
//!
//!     let outcome = holder.set_option_value("rate", 0.07.into(), Some("billing")).await;
//!     assert!(outcome.ok);
//!
//!     let rate = holder.option_value("rate", Some("billing")).await?;
//!     println!("rate = {:?}", rate);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod errors;
pub mod store;
pub mod vault;

// Re-export commonly used types and traits
pub use config::{AuthMethod, VaultSettings};
pub use errors::{Error, Result};
pub use store::{
    CachedOptionHolder, KeySpaceMap, KeySpacePaths, KvClient, KvEngineVersion, MemoryKvClient,
    OptionBag, OptionHolder, SecretString, VaultOptionHolder, WriteOutcome,
};
pub use vault::VaultHttpClient;

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
