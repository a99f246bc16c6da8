//! Integration tests for admin authentication
//!
//! Tests cover:
//! - Password grant form fields
//! - Rejected credentials
//! - Malformed token responses
//! - Reconciler::connect aborting on authentication failure

mod common;

use common::{config_for, TestContext};
use realmsync_cli::api::{AdminAuthenticator, ApiError, TOKEN_PATH};
use realmsync_cli::error::LoaderError;
use realmsync_cli::reconcile::Reconciler;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_password_grant_returns_token() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=admin-cli"))
        .and(body_string_contains("username=admin"))
        .and(body_string_contains("password=admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc",
            "token_type": "Bearer",
            "expires_in": 60
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AdminAuthenticator::new(&ctx.config()).unwrap();
    assert!(auth.token_url().ends_with(TOKEN_PATH));

    let token = auth.authorize().await.unwrap();
    assert_eq!(token.authorization(), "Bearer abc");
}

#[tokio::test]
async fn test_configured_client_id_is_sent() {
    let ctx = TestContext::new().await;
    let config = config_for(&ctx.server.uri(), &[("ADMIN_CLIENT_ID", "loader")]);

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .and(body_string_contains("client_id=loader"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "abc",
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    AdminAuthenticator::new(&config)
        .unwrap()
        .authorize()
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rejected_credentials() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_grant"})),
        )
        .mount(&ctx.server)
        .await;

    let err = AdminAuthenticator::new(&ctx.config())
        .unwrap()
        .authorize()
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Auth(_)));
    assert!(err.to_string().contains("401"));
    assert_eq!(LoaderError::from(err).exit_code(), 2);
}

#[tokio::test]
async fn test_response_without_access_token() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token_type": "Bearer"})))
        .mount(&ctx.server)
        .await;

    let err = AdminAuthenticator::new(&ctx.config())
        .unwrap()
        .authorize()
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Auth(_)));
}

#[tokio::test]
async fn test_connect_uses_token_for_admin_calls() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/realms/test/users"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let reconciler = Reconciler::connect(&ctx.config()).await.unwrap();
    let report = reconciler.delete_users().await.unwrap();
    assert_eq!(report.total, 0);
}

#[tokio::test]
async fn test_connect_fails_without_token() {
    let ctx = TestContext::new().await;
    ctx.forbid("GET").await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.server)
        .await;

    let err = Reconciler::connect(&ctx.config()).await.unwrap_err();
    assert!(matches!(err, LoaderError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn test_unreachable_token_endpoint_is_connection_error() {
    let config = config_for("http://127.0.0.1:1", &[]);
    let err = Reconciler::connect(&config).await.unwrap_err();
    assert!(matches!(err, LoaderError::ConnectionFailed(_)));
    assert_eq!(err.exit_code(), 3);
}
