//! Vault login flows.
//!
//! Exchanges the configured [`AuthMethod`] credentials for a client token.
//! Token auth is a pass-through; userpass and approle perform a login request
//! against the corresponding auth mount and extract `auth.client_token` from
//! the response.

use serde_json::json;
use tracing::{debug, error};

use crate::config::AuthMethod;
use crate::errors::{Error, Result};
use crate::store::SecretString;

/// Resolve a client token for the given auth method.
///
/// `base` is the server address without a trailing slash.
///
/// # Errors
///
/// - [`Error::Auth`] when the backend rejects the login
/// - [`Error::Transport`] when the login request fails or the response has
///   no `auth.client_token`
pub(crate) async fn login(
    http: &reqwest::Client,
    base: &str,
    namespace: Option<&str>,
    auth: &AuthMethod,
) -> Result<SecretString> {
    match auth {
        AuthMethod::Token { token } => Ok(token.clone()),
        AuthMethod::UserPass { username, password } => {
            let url = format!("{}/v1/auth/userpass/login/{}", base, username);
            let body = json!({ "password": password.expose_secret() });
            request_token(http, &url, namespace, &body, "userpass").await
        }
        AuthMethod::AppRole { role_id, secret_id } => {
            let url = format!("{}/v1/auth/approle/login", base);
            let body = json!({
                "role_id": role_id,
                "secret_id": secret_id.expose_secret(),
            });
            request_token(http, &url, namespace, &body, "approle").await
        }
    }
}

async fn request_token(
    http: &reqwest::Client,
    url: &str,
    namespace: Option<&str>,
    body: &serde_json::Value,
    flow: &str,
) -> Result<SecretString> {
    debug!(flow = %flow, "Logging in to Vault");

    let mut request = http.post(url).json(body);
    if let Some(namespace) = namespace {
        request = request.header("X-Vault-Namespace", namespace);
    }

    let response = request
        .send()
        .await
        .map_err(|e| Error::transport(format!("Vault {} login request failed: {}", flow, e)))?;

    let status = response.status();
    if !status.is_success() {
        error!(flow = %flow, status = %status, "Vault login rejected");
        return Err(Error::auth(format!("Vault {} login failed with status {}", flow, status)));
    }

    let payload: serde_json::Value = response
        .json()
        .await
        .map_err(|e| Error::transport(format!("Unparseable Vault {} login response: {}", flow, e)))?;

    let token = payload
        .get("auth")
        .and_then(|auth| auth.get("client_token"))
        .and_then(|token| token.as_str())
        .ok_or_else(|| {
            Error::transport(format!("Vault {} login response has no auth.client_token", flow))
        })?;

    debug!(flow = %flow, "Vault login succeeded");
    Ok(SecretString::new(token))
}
