//! HTTP adapter for HashiCorp Vault.
//!
//! Implements the [`KvClient`] port against Vault's raw `/v1/{path}` HTTP
//! API. The store owns all KV v1/v2 path shaping and enveloping, so this
//! adapter deliberately knows nothing about engine versions: it reads and
//! writes opaque bags at opaque paths.
//!
//! Authentication is lazy: the first read or write resolves a client token
//! via the configured [`AuthMethod`] and caches it for the lifetime of the
//! client. Failed calls are not retried; transport and auth failures surface
//! to the store as-is.

pub mod auth;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::config::VaultSettings;
use crate::errors::{Error, Result};
use crate::store::{KvClient, OptionBag, SecretString};

/// Vault client speaking the raw KV HTTP API.
pub struct VaultHttpClient {
    http: reqwest::Client,
    base: String,
    namespace: Option<String>,
    auth: crate::config::AuthMethod,
    token: RwLock<Option<SecretString>>,
}

impl std::fmt::Debug for VaultHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultHttpClient")
            .field("base", &self.base)
            .field("namespace", &self.namespace)
            .field("auth", &self.auth.kind())
            .finish()
    }
}

impl VaultHttpClient {
    /// Create a client for the given settings.
    ///
    /// Validation is eager: a missing or malformed address or incomplete
    /// credentials fail here with [`Error::Config`], never at call time. No
    /// network traffic happens until the first read or write.
    pub fn new(settings: VaultSettings) -> Result<Self> {
        settings.validate()?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let base = settings.address.trim_end_matches('/').to_string();
        info!(address = %base, auth = %settings.auth.kind(), "Initialized Vault client");

        Ok(Self {
            http,
            base,
            namespace: settings.namespace,
            auth: settings.auth,
            token: RwLock::new(None),
        })
    }

    /// Create a client from environment variables (see
    /// [`VaultSettings::from_env`]).
    pub fn from_env() -> Result<Self> {
        Self::new(VaultSettings::from_env()?)
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base, path.trim_start_matches('/'))
    }

    /// Resolve the cached client token, logging in on first use.
    async fn ensure_token(&self) -> Result<SecretString> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }

        let mut slot = self.token.write().await;
        // Another caller may have logged in while we waited for the lock.
        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }

        let token =
            auth::login(&self.http, &self.base, self.namespace.as_deref(), &self.auth).await?;
        *slot = Some(token.clone());
        Ok(token)
    }

    fn apply_headers(
        &self,
        request: reqwest::RequestBuilder,
        token: &SecretString,
    ) -> reqwest::RequestBuilder {
        let request = request.header("X-Vault-Token", token.expose_secret());
        match &self.namespace {
            Some(namespace) => request.header("X-Vault-Namespace", namespace),
            None => request,
        }
    }
}

/// Map a non-success Vault status to the store's error kinds.
fn status_error(status: StatusCode, path: &str) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Error::auth(format!("Vault denied access to '{}' ({})", path, status))
        }
        _ => Error::transport(format!(
            "Vault request for '{}' failed with status {}",
            path, status
        )),
    }
}

#[async_trait]
impl KvClient for VaultHttpClient {
    async fn read_by_path(&self, path: &str) -> Result<Option<OptionBag>> {
        let token = self.ensure_token().await?;
        debug!(path = %path, "Reading from Vault");

        let request = self.apply_headers(self.http.get(self.url_for(path)), &token);
        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(format!("Vault read for '{}' failed: {}", path, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(path = %path, "No data stored at path");
            return Ok(None);
        }
        if !status.is_success() {
            error!(path = %path, status = %status, "Vault read rejected");
            return Err(status_error(status, path));
        }

        let payload: serde_json::Value = response.json().await.map_err(|e| {
            Error::transport(format!("Unparseable Vault response for '{}': {}", path, e))
        })?;

        match payload.get("data") {
            Some(serde_json::Value::Object(bag)) => Ok(Some(bag.clone())),
            _ => Ok(None),
        }
    }

    async fn write_by_path(&self, path: &str, bag: &OptionBag) -> Result<()> {
        let token = self.ensure_token().await?;
        debug!(path = %path, keys = bag.len(), "Writing to Vault");

        let request = self.apply_headers(self.http.post(self.url_for(path)), &token).json(bag);
        let response = request
            .send()
            .await
            .map_err(|e| Error::transport(format!("Vault write for '{}' failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            error!(path = %path, status = %status, "Vault write rejected");
            return Err(status_error(status, path));
        }

        Ok(())
    }
}
