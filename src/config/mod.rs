//! # Configuration
//!
//! Construction-time settings for the Vault-backed option store. The hosting
//! application supplies these already-resolved values (from its own settings
//! storage or the environment); this module validates them eagerly so a
//! misconfigured backend fails at construction, never at call time.

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::errors::{Error, Result};
use crate::store::{KeySpaceMap, KvEngineVersion, SecretString};

/// How the adapter authenticates against Vault.
///
/// A closed set of variants: the three login flows the store actually wires
/// credentials to. No dynamic strategy lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthMethod {
    /// Static client token.
    Token { token: SecretString },
    /// Username/password login against the `userpass` auth mount.
    UserPass { username: String, password: SecretString },
    /// AppRole login with role id and secret id.
    AppRole { role_id: String, secret_id: SecretString },
}

impl AuthMethod {
    /// Short identifier for logging; never exposes credentials.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Token { .. } => "token",
            Self::UserPass { .. } => "userpass",
            Self::AppRole { .. } => "approle",
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::Token { token } if token.is_empty() => {
                Err(Error::config("Vault token is empty"))
            }
            Self::UserPass { username, .. } if username.is_empty() => {
                Err(Error::config("Vault username is empty"))
            }
            Self::UserPass { password, .. } if password.is_empty() => {
                Err(Error::config("Vault password is empty"))
            }
            Self::AppRole { role_id, .. } if role_id.is_empty() => {
                Err(Error::config("Vault roleId is empty"))
            }
            Self::AppRole { secret_id, .. } if secret_id.is_empty() => {
                Err(Error::config("Vault secretId is empty"))
            }
            _ => Ok(()),
        }
    }
}

/// Settings for one option-store instance.
///
/// Immutable after construction; the store caches nothing derived from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultSettings {
    /// Vault server address (e.g. "https://vault.example.com:8200").
    pub address: String,

    /// Vault namespace (Enterprise multi-tenancy), sent as the
    /// `X-Vault-Namespace` header when present.
    pub namespace: Option<String>,

    /// Authentication method and its credentials.
    pub auth: AuthMethod,

    /// KV engine version of the addressed mount.
    #[serde(default = "default_engine_version")]
    pub engine_version: KvEngineVersion,

    /// KV mount path (default: "secret").
    #[serde(default = "default_mount_path")]
    pub mount_path: String,

    /// Logical keyspace to physical path segment rename table.
    #[serde(default)]
    pub keyspace_map: KeySpaceMap,
}

fn default_engine_version() -> KvEngineVersion {
    KvEngineVersion::V2
}

fn default_mount_path() -> String {
    crate::store::KeySpacePaths::DEFAULT_MOUNT.to_string()
}

impl VaultSettings {
    /// Validate the settings as a whole.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] when the address is missing or not a valid absolute
    /// URL, or when the chosen auth method is missing a credential field.
    pub fn validate(&self) -> Result<()> {
        if self.address.is_empty() {
            return Err(Error::config("Vault address is empty"));
        }
        Url::parse(&self.address)
            .map_err(|e| Error::config(format!("Invalid Vault address '{}': {}", self.address, e)))?;

        if self.mount_path.is_empty() {
            return Err(Error::config("KV mount path is empty"));
        }

        self.auth.validate()
    }

    /// Load settings from environment variables.
    ///
    /// Reads:
    /// - `VAULT_ADDR` (required)
    /// - `VAULT_NAMESPACE` (optional)
    /// - `VAULT_MOUNT_PATH` (default: "secret")
    /// - `OPTVAULT_KV_VERSION` ("1" or "2", default: "2")
    /// - `OPTVAULT_KEYSPACE_MAP` (optional JSON list of `{from, to}` rules)
    /// - auth, first match wins: `VAULT_TOKEN`, or
    ///   `OPTVAULT_ROLE_ID`/`OPTVAULT_SECRET_ID`, or
    ///   `OPTVAULT_USERNAME`/`OPTVAULT_PASSWORD`
    ///
    /// # Errors
    ///
    /// [`Error::Config`] when `VAULT_ADDR` is unset, no auth variables are
    /// present, or the resulting settings fail [`VaultSettings::validate`].
    pub fn from_env() -> Result<Self> {
        let address = std::env::var("VAULT_ADDR")
            .map_err(|_| Error::config("VAULT_ADDR environment variable not set"))?;

        let namespace = std::env::var("VAULT_NAMESPACE").ok();
        let mount_path =
            std::env::var("VAULT_MOUNT_PATH").unwrap_or_else(|_| default_mount_path());

        let engine_version = match std::env::var("OPTVAULT_KV_VERSION") {
            Ok(raw) => raw.parse::<KvEngineVersion>().map_err(Error::Config)?,
            Err(_) => default_engine_version(),
        };

        let keyspace_map = std::env::var("OPTVAULT_KEYSPACE_MAP")
            .map(|raw| parse_keyspace_map(&raw))
            .unwrap_or_default();

        let auth = if let Ok(token) = std::env::var("VAULT_TOKEN") {
            AuthMethod::Token { token: token.into() }
        } else if let (Ok(role_id), Ok(secret_id)) =
            (std::env::var("OPTVAULT_ROLE_ID"), std::env::var("OPTVAULT_SECRET_ID"))
        {
            AuthMethod::AppRole { role_id, secret_id: secret_id.into() }
        } else if let (Ok(username), Ok(password)) =
            (std::env::var("OPTVAULT_USERNAME"), std::env::var("OPTVAULT_PASSWORD"))
        {
            AuthMethod::UserPass { username, password: password.into() }
        } else {
            return Err(Error::config(
                "No Vault auth configured: set VAULT_TOKEN, OPTVAULT_ROLE_ID/OPTVAULT_SECRET_ID, \
                 or OPTVAULT_USERNAME/OPTVAULT_PASSWORD",
            ));
        };

        let settings =
            Self { address, namespace, auth, engine_version, mount_path, keyspace_map };
        settings.validate()?;
        Ok(settings)
    }
}

/// Parse a keyspace rename table from its JSON-encoded form.
///
/// The input is a list of `{"from": ..., "to": ...}` rules. Entries missing
/// either field are skipped; unparseable input yields an empty table. Both
/// lenient paths log what was dropped.
pub fn parse_keyspace_map(raw: &str) -> KeySpaceMap {
    let mut map = KeySpaceMap::new();
    if raw.trim().is_empty() {
        return map;
    }

    #[derive(Deserialize)]
    struct RenameRule {
        from: Option<String>,
        to: Option<String>,
    }

    let rules: Vec<RenameRule> = match serde_json::from_str(raw) {
        Ok(rules) => rules,
        Err(e) => {
            warn!(error = %e, "Ignoring unparseable keyspace map");
            return map;
        }
    };

    for rule in rules {
        match (rule.from, rule.to) {
            (Some(from), Some(to)) if !from.is_empty() && !to.is_empty() => {
                map.insert(from, to);
            }
            (from, _) => {
                warn!(from = ?from, "Skipping incomplete keyspace rename rule");
            }
        }
    }

    map
}
