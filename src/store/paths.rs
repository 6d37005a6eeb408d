//! Keyspace path resolution.
//!
//! Maps a logical keyspace name to the physical backend path, applying the
//! configuration-supplied rename table and the KV-engine path shape. Pure
//! functions of the construction-time bindings: no hidden state, no caching,
//! no failure modes.

use std::collections::BTreeMap;

use super::handler::KvEngineVersion;

/// Rename table from logical keyspace name to physical path segment.
///
/// Lookups are exact-string and case-sensitive; absent entries pass through
/// unchanged. Built once at store construction from external configuration.
pub type KeySpaceMap = BTreeMap<String, String>;

/// Resolves logical keyspaces to backend paths for one store instance.
///
/// Bound to one KV mount prefix and one rename table; both are immutable
/// after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpacePaths {
    mount: String,
    map: KeySpaceMap,
}

impl KeySpacePaths {
    /// Default KV mount prefix when none is configured.
    pub const DEFAULT_MOUNT: &'static str = "secret";

    /// Create a resolver for the given mount prefix and rename table.
    pub fn new(mount: impl Into<String>, map: KeySpaceMap) -> Self {
        Self { mount: mount.into(), map }
    }

    /// The configured KV mount prefix.
    pub fn mount(&self) -> &str {
        &self.mount
    }

    /// Resolve a logical keyspace to its physical path segment.
    ///
    /// Returns the mapped segment when the rename table has an entry for
    /// `keyspace`, otherwise the keyspace name itself.
    pub fn resolve_segment<'a>(&'a self, keyspace: &'a str) -> &'a str {
        self.map.get(keyspace).map(String::as_str).unwrap_or(keyspace)
    }

    /// Build the full backend path for a keyspace under the given engine
    /// version.
    ///
    /// - V1: `{mount}/{segment}`
    /// - V2: `{mount}/data/{segment}` (KV v2 addresses data through the
    ///   `data/` sub-path of the mount)
    pub fn path_for(&self, keyspace: &str, version: KvEngineVersion) -> String {
        let segment = self.resolve_segment(keyspace);
        match version {
            KvEngineVersion::V1 => format!("{}/{}", self.mount, segment),
            KvEngineVersion::V2 => format!("{}/data/{}", self.mount, segment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rename_map() -> KeySpaceMap {
        let mut map = KeySpaceMap::new();
        map.insert("billing".to_string(), "fin/billing".to_string());
        map.insert("mailer".to_string(), "infra/mailer".to_string());
        map
    }

    #[test]
    fn test_resolve_segment_mapped() {
        let paths = KeySpacePaths::new("secret", rename_map());
        assert_eq!(paths.resolve_segment("billing"), "fin/billing");
        assert_eq!(paths.resolve_segment("mailer"), "infra/mailer");
    }

    #[test]
    fn test_resolve_segment_unmapped_passes_through() {
        let paths = KeySpacePaths::new("secret", rename_map());
        assert_eq!(paths.resolve_segment("payments"), "payments");
    }

    #[test]
    fn test_resolve_segment_is_case_sensitive() {
        let paths = KeySpacePaths::new("secret", rename_map());
        assert_eq!(paths.resolve_segment("Billing"), "Billing");
    }

    #[test]
    fn test_v1_path_has_no_data_segment() {
        let paths = KeySpacePaths::new("secret", KeySpaceMap::new());
        assert_eq!(paths.path_for("app", KvEngineVersion::V1), "secret/app");
    }

    #[test]
    fn test_v2_path_has_data_segment_after_mount() {
        let paths = KeySpacePaths::new("secret", KeySpaceMap::new());
        assert_eq!(paths.path_for("app", KvEngineVersion::V2), "secret/data/app");
    }

    #[test]
    fn test_path_applies_rename_map() {
        let paths = KeySpacePaths::new("secret", rename_map());
        assert_eq!(paths.path_for("billing", KvEngineVersion::V2), "secret/data/fin/billing");
        assert_eq!(paths.path_for("billing", KvEngineVersion::V1), "secret/fin/billing");
    }

    #[test]
    fn test_custom_mount() {
        let paths = KeySpacePaths::new("kv", KeySpaceMap::new());
        assert_eq!(paths.path_for("app", KvEngineVersion::V1), "kv/app");
        assert_eq!(paths.path_for("app", KvEngineVersion::V2), "kv/data/app");
    }

    #[test]
    fn test_path_is_deterministic() {
        let paths = KeySpacePaths::new("secret", rename_map());
        let first = paths.path_for("billing", KvEngineVersion::V2);
        let second = paths.path_for("billing", KvEngineVersion::V2);
        assert_eq!(first, second);
    }
}
