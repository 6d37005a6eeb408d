//! Core value types for the option store.
//!
//! An [`OptionBag`] is the full set of key/value pairs stored under one
//! keyspace at one point in time. It is never an incremental diff: every read
//! and write against the backend moves the whole bag, and partial updates are
//! merged into it before writing (see `store::handler`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The full contents of one keyspace: option key to JSON value.
///
/// `Option<OptionBag>` distinguishes "no data stored at this path" (`None`)
/// from an empty bag (`Some` with no entries).
pub type OptionBag = serde_json::Map<String, serde_json::Value>;

/// Result of a fail-soft option write.
///
/// `set_option_value` never raises to its caller: any failure from the
/// read-merge-write sequence is reported here instead, so configuration-write
/// failures degrade gracefully in caller UIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// `true` when the merged bag was written back successfully.
    pub ok: bool,
    /// Error messages collected from the failed attempt; empty on success.
    pub errors: Vec<String>,
}

impl WriteOutcome {
    /// A successful outcome.
    pub fn success() -> Self {
        Self { ok: true, errors: Vec::new() }
    }

    /// A failed outcome carrying a single error message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self { ok: false, errors: vec![message.into()] }
    }
}

/// A string wrapper that redacts its contents in Debug, Display, and
/// serialization, and zeroes its memory on drop.
///
/// Used for Vault tokens, passwords, and AppRole secret ids so credentials
/// never leak through logging or serialized configuration. The actual value
/// is only reachable via [`SecretString::expose_secret`].
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new SecretString from a string value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the underlying secret value.
    ///
    /// Only call this where the raw credential is actually needed (request
    /// headers, login bodies). Never log the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Never serialize the actual credential.
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(SecretString(value))
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_outcome_success() {
        let outcome = WriteOutcome::success();
        assert!(outcome.ok);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_write_outcome_failure() {
        let outcome = WriteOutcome::failure("backend unreachable");
        assert!(!outcome.ok);
        assert_eq!(outcome.errors, vec!["backend unreachable".to_string()]);
    }

    #[test]
    fn test_secret_string_redacts_debug_and_display() {
        let secret = SecretString::new("hvs.super-secret-token");
        assert_eq!(format!("{:?}", secret), "SecretString([REDACTED])");
        assert_eq!(format!("{}", secret), "[REDACTED]");
    }

    #[test]
    fn test_secret_string_redacts_serialization() {
        let secret = SecretString::new("hvs.super-secret-token");
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, "\"[REDACTED]\"");
        assert!(!json.contains("super-secret"));
    }

    #[test]
    fn test_secret_string_deserializes_real_value() {
        let secret: SecretString = serde_json::from_str("\"plain-value\"").unwrap();
        assert_eq!(secret.expose_secret(), "plain-value");
    }

    #[test]
    fn test_secret_string_expose() {
        let secret = SecretString::new("value");
        assert_eq!(secret.expose_secret(), "value");
        assert!(!secret.is_empty());
        assert!(SecretString::new("").is_empty());
    }
}
