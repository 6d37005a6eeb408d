//! # Error Handling
//!
//! Error types for the option store. Construction-time configuration problems
//! are always fail-loud; transport and auth failures surface from the backend
//! port untouched on the read path and are folded into a [`WriteOutcome`] on
//! the write path (see `store::holder`).
//!
//! [`WriteOutcome`]: crate::store::WriteOutcome

/// Custom result type for optvault operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the option store.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A required setting (address, auth credentials, rename map) is missing
    /// or malformed. Raised eagerly at construction, never at call time.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend rejected the request as unauthenticated or a login flow
    /// failed.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The backend is unreachable, returned an unexpected status, or the
    /// response could not be parsed. Never retried by the store.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered but the payload shape is not what the KV engine
    /// contract promises.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new authentication error.
    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth(message.into())
    }

    /// Create a new transport error.
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new backend error.
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend(message.into())
    }
}
