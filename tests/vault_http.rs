//! Wire-level tests of the Vault HTTP adapter against a mock server.
//!
//! Asserts the exact paths, headers, and bodies Vault receives for both KV
//! engine versions, the lazy login flows, and how HTTP failures map onto the
//! store's error kinds.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use optvault::{
    AuthMethod, Error, KeySpaceMap, KeySpacePaths, KvClient, KvEngineVersion, OptionHolder,
    VaultHttpClient, VaultOptionHolder, VaultSettings,
};

fn token_settings(address: &str) -> VaultSettings {
    VaultSettings {
        address: address.to_string(),
        namespace: None,
        auth: AuthMethod::Token { token: "hvs.test-token".into() },
        engine_version: KvEngineVersion::V2,
        mount_path: "secret".to_string(),
        keyspace_map: KeySpaceMap::new(),
    }
}

#[tokio::test]
async fn read_sends_token_and_returns_data_object() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .and(header("X-Vault-Token", "hvs.test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"x": 5}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = VaultHttpClient::new(token_settings(&server.uri())).unwrap();
    let bag = client.read_by_path("secret/app").await.unwrap().unwrap();
    assert_eq!(bag.get("x"), Some(&json!(5)));
}

#[tokio::test]
async fn read_missing_path_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"errors": []})))
        .mount(&server)
        .await;

    let client = VaultHttpClient::new(token_settings(&server.uri())).unwrap();
    assert!(client.read_by_path("secret/missing").await.unwrap().is_none());
}

#[tokio::test]
async fn forbidden_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"errors": ["denied"]})))
        .mount(&server)
        .await;

    let client = VaultHttpClient::new(token_settings(&server.uri())).unwrap();
    let err = client.read_by_path("secret/app").await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
}

#[tokio::test]
async fn server_failure_maps_to_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = VaultHttpClient::new(token_settings(&server.uri())).unwrap();
    let err = client.read_by_path("secret/app").await.unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[tokio::test]
async fn failed_write_through_store_becomes_outcome() {
    let server = MockServer::start().await;
    // Read during merge finds nothing; the write is rejected.
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/app"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut settings = token_settings(&server.uri());
    settings.engine_version = KvEngineVersion::V1;
    let client = VaultHttpClient::new(settings).unwrap();
    let holder = VaultOptionHolder::new(
        client,
        "app",
        KvEngineVersion::V1,
        KeySpacePaths::new("secret", KeySpaceMap::new()),
    );

    let outcome = holder.set_option_value("x", json!(5), None).await;
    assert!(!outcome.ok);
    assert!(outcome.errors[0].contains("status 500"));
}

#[tokio::test]
async fn v1_store_writes_plain_bag_at_v1_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/app"))
        .and(body_json(json!({"x": 5})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = VaultHttpClient::new(token_settings(&server.uri())).unwrap();
    let holder = VaultOptionHolder::new(
        client,
        "app",
        KvEngineVersion::V1,
        KeySpacePaths::new("secret", KeySpaceMap::new()),
    );

    assert!(holder.set_option_value("x", json!(5), Some("app")).await.ok);
}

#[tokio::test]
async fn v2_store_writes_envelope_at_renamed_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/fin/billing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/fin/billing"))
        .and(body_json(json!({"data": {"rate": 0.07}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"version": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut map = KeySpaceMap::new();
    map.insert("billing".to_string(), "fin/billing".to_string());

    let client = VaultHttpClient::new(token_settings(&server.uri())).unwrap();
    let holder = VaultOptionHolder::new(
        client,
        "app",
        KvEngineVersion::V2,
        KeySpacePaths::new("secret", map),
    );

    assert!(holder.set_option_value("rate", json!(0.07), Some("billing")).await.ok);
}

#[tokio::test]
async fn v2_merge_reads_current_envelope_before_writing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/data/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"data": {"a": 1}, "metadata": {"version": 3}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/secret/data/app"))
        .and(body_json(json!({"data": {"a": 1, "b": 2}})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = VaultHttpClient::new(token_settings(&server.uri())).unwrap();
    let holder = VaultOptionHolder::new(
        client,
        "app",
        KvEngineVersion::V2,
        KeySpacePaths::new("secret", KeySpaceMap::new()),
    );

    assert!(holder.set_option_value("b", json!(2), None).await.ok);
}

#[tokio::test]
async fn userpass_login_happens_once_and_tokens_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/userpass/login/admin"))
        .and(body_json(json!({"password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"auth": {"client_token": "s.userpass-token"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .and(header("X-Vault-Token", "s.userpass-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"x": 1}})))
        .expect(2)
        .mount(&server)
        .await;

    let mut settings = token_settings(&server.uri());
    settings.auth = AuthMethod::UserPass { username: "admin".to_string(), password: "pw".into() };
    let client = VaultHttpClient::new(settings).unwrap();

    // Two reads, one login.
    assert!(client.read_by_path("secret/app").await.unwrap().is_some());
    assert!(client.read_by_path("secret/app").await.unwrap().is_some());
}

#[tokio::test]
async fn approle_login_posts_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/approle/login"))
        .and(body_json(json!({"role_id": "role-1", "secret_id": "sid-1"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"auth": {"client_token": "s.approle-token"}})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .and(header("X-Vault-Token", "s.approle-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;

    let mut settings = token_settings(&server.uri());
    settings.auth =
        AuthMethod::AppRole { role_id: "role-1".to_string(), secret_id: "sid-1".into() };
    let client = VaultHttpClient::new(settings).unwrap();

    let bag = client.read_by_path("secret/app").await.unwrap();
    assert_eq!(bag, Some(Default::default()));
}

#[tokio::test]
async fn rejected_login_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/auth/userpass/login/admin"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"errors": ["bad creds"]})))
        .mount(&server)
        .await;

    let mut settings = token_settings(&server.uri());
    settings.auth = AuthMethod::UserPass { username: "admin".to_string(), password: "pw".into() };
    let client = VaultHttpClient::new(settings).unwrap();

    let err = client.read_by_path("secret/app").await.unwrap_err();
    assert!(matches!(err, Error::Auth(_)));
}

#[tokio::test]
async fn namespace_header_is_sent_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .and(header("X-Vault-Namespace", "team-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"x": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let mut settings = token_settings(&server.uri());
    settings.namespace = Some("team-a".to_string());
    let client = VaultHttpClient::new(settings).unwrap();

    assert!(client.read_by_path("secret/app").await.unwrap().is_some());
}
