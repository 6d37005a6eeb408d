//! Backend client port.
//!
//! The store depends on this narrow capability interface instead of any
//! concrete Vault client: read a bag of key/value data at a path, write a bag
//! at a path. Transport, TLS, and authentication all belong to the adapter
//! implementing the trait (see `crate::vault`), which keeps the path-shaping
//! and merge logic fully decoupled from the wire.

use async_trait::async_trait;

use super::types::OptionBag;
use crate::errors::Result;

/// Raw path-addressed KV access to the secrets backend.
///
/// Implementations must be `Send + Sync` for use across async tasks. The
/// store never retries: transport and auth failures surface to the caller
/// as-is.
#[async_trait]
pub trait KvClient: Send + Sync {
    /// Fetch whatever bag is stored at `path`.
    ///
    /// Returns `Ok(None)` when nothing is stored at the path, which is
    /// distinct from an empty bag.
    ///
    /// # Errors
    ///
    /// - [`Error::Transport`] if the backend is unreachable or the response
    ///   cannot be parsed
    /// - [`Error::Auth`] if the call is unauthenticated
    ///
    /// [`Error::Transport`]: crate::errors::Error::Transport
    /// [`Error::Auth`]: crate::errors::Error::Auth
    async fn read_by_path(&self, path: &str) -> Result<Option<OptionBag>>;

    /// Store `bag` at `path`, replacing whatever was there.
    ///
    /// Fails with the same error kinds as [`KvClient::read_by_path`].
    async fn write_by_path(&self, path: &str, bag: &OptionBag) -> Result<()>;
}

#[async_trait]
impl<T: KvClient + ?Sized> KvClient for &T {
    async fn read_by_path(&self, path: &str) -> Result<Option<OptionBag>> {
        (**self).read_by_path(path).await
    }

    async fn write_by_path(&self, path: &str, bag: &OptionBag) -> Result<()> {
        (**self).write_by_path(path, bag).await
    }
}

#[async_trait]
impl<T: KvClient + ?Sized> KvClient for std::sync::Arc<T> {
    async fn read_by_path(&self, path: &str) -> Result<Option<OptionBag>> {
        (**self).read_by_path(path).await
    }

    async fn write_by_path(&self, path: &str, bag: &OptionBag) -> Result<()> {
        (**self).write_by_path(path, bag).await
    }
}
