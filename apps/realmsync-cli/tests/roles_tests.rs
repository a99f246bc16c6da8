//! Integration tests for the roles pass
//!
//! Tests cover:
//! - Unseen role: one create, no update
//! - Existing role: one update, no create
//! - Re-running the same rows only updates
//! - Malformed and rejected rows are recorded and skipped
//! - Listing failure aborts the pass
//! - Names with reserved URL characters address their own path

mod common;

use common::{row, TestContext};
use realmsync_cli::error::LoaderError;
use realmsync_cli::reconcile::ItemStatus;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_unseen_role_is_created_once() {
    let ctx = TestContext::new().await;
    ctx.forbid("PUT").await;
    ctx.mock_get(&ctx.paths.roles(), json!([])).await;

    Mock::given(method("POST"))
        .and(path("/admin/realms/test/roles"))
        .and(body_json(json!({"name": "admin", "description": "Full access"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let rows = vec![row(&[("Role", "admin"), ("Role description", "Full access")])];
    let report = ctx
        .reconciler()
        .handle_roles(&rows, "Role", Some("Role description"))
        .await
        .unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(report.updated, 0);
}

#[tokio::test]
async fn test_existing_role_is_updated_once() {
    let ctx = TestContext::new().await;
    ctx.forbid("POST").await;
    ctx.mock_get(
        &ctx.paths.roles(),
        json!([{"id": "r1", "name": "admin", "description": "old"}]),
    )
    .await;

    Mock::given(method("PUT"))
        .and(path("/admin/realms/test/roles/admin"))
        .and(body_json(json!({"name": "admin", "description": "Full access"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let rows = vec![row(&[("Role", "admin"), ("Role description", "Full access")])];
    let report = ctx
        .reconciler()
        .handle_roles(&rows, "Role", Some("Role description"))
        .await
        .unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.items[0].status, ItemStatus::Updated);
}

#[tokio::test]
async fn test_rerun_only_updates() {
    let ctx = TestContext::new().await;
    ctx.forbid("POST").await;
    ctx.mock_get(
        &ctx.paths.roles(),
        json!([
            {"id": "r1", "name": "admin", "description": "Full access"},
            {"id": "r2", "name": "viewer", "description": ""}
        ]),
    )
    .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&ctx.server)
        .await;

    let rows = vec![
        row(&[("Role", "admin"), ("Role description", "Full access")]),
        row(&[("Role", "viewer"), ("Role description", "")]),
    ];
    let report = ctx
        .reconciler()
        .handle_roles(&rows, "Role", Some("Role description"))
        .await
        .unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 2);
}

#[tokio::test]
async fn test_missing_description_column_sends_empty_description() {
    let ctx = TestContext::new().await;
    ctx.mock_get(&ctx.paths.roles(), json!([])).await;

    Mock::given(method("POST"))
        .and(path("/admin/realms/test/roles"))
        .and(body_json(json!({"name": "auditor", "description": ""})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let rows = vec![row(&[("Role", "auditor")])];
    let report = ctx
        .reconciler()
        .handle_roles(&rows, "Role", Some("Role description"))
        .await
        .unwrap();
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn test_malformed_row_is_skipped_and_later_rows_processed() {
    let ctx = TestContext::new().await;
    ctx.mock_get(&ctx.paths.roles(), json!([])).await;

    Mock::given(method("POST"))
        .and(path("/admin/realms/test/roles"))
        .and(body_json(json!({"name": "viewer", "description": ""})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let rows = vec![
        row(&[("Role", ""), ("Role description", "orphan")]),
        row(&[("Description", "no role column")]),
        row(&[("Role", "viewer"), ("Role description", "")]),
    ];
    let report = ctx
        .reconciler()
        .handle_roles(&rows, "Role", Some("Role description"))
        .await
        .unwrap();

    assert_eq!(report.failed, 2);
    assert_eq!(report.created, 1);
    let errors: Vec<&str> = report
        .failed_items()
        .filter_map(|i| i.error.as_deref())
        .collect();
    assert!(errors[0].contains("data format error"));
    assert!(errors[1].contains("missing key in data: Role"));
}

#[tokio::test]
async fn test_rejected_create_does_not_stop_the_pass() {
    let ctx = TestContext::new().await;
    ctx.mock_get(&ctx.paths.roles(), json!([])).await;

    Mock::given(method("POST"))
        .and(path("/admin/realms/test/roles"))
        .and(body_json(json!({"name": "admin", "description": ""})))
        .respond_with(ResponseTemplate::new(409).set_body_string("Role with name admin already exists"))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/realms/test/roles"))
        .and(body_json(json!({"name": "viewer", "description": ""})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let rows = vec![row(&[("Role", "admin")]), row(&[("Role", "viewer")])];
    let report = ctx.reconciler().handle_roles(&rows, "Role", None).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.created, 1);
    assert!(report.items[0]
        .error
        .as_deref()
        .unwrap()
        .contains("409"));
}

#[tokio::test]
async fn test_listing_failure_aborts_pass() {
    let ctx = TestContext::new().await;
    ctx.forbid("POST").await;

    Mock::given(method("GET"))
        .and(path("/admin/realms/test/roles"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ctx.server)
        .await;

    let rows = vec![row(&[("Role", "admin")])];
    let err = ctx
        .reconciler()
        .handle_roles(&rows, "Role", None)
        .await
        .unwrap_err();

    assert!(matches!(err, LoaderError::Api { status: 503, .. }));
    assert_eq!(err.exit_code(), 5);
}

#[tokio::test]
async fn test_role_name_with_reserved_characters_updates_that_role() {
    let ctx = TestContext::new().await;
    ctx.forbid("POST").await;
    ctx.mock_get(
        &ctx.paths.roles(),
        json!([
            {"id": "r1", "name": "a"},
            {"id": "r2", "name": "a#b"}
        ]),
    )
    .await;

    Mock::given(method("PUT"))
        .and(path("/admin/realms/test/roles/a%23b"))
        .and(body_json(json!({"name": "a#b", "description": ""})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/admin/realms/test/roles/a"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let rows = vec![row(&[("Role", "a#b")])];
    let report = ctx.reconciler().handle_roles(&rows, "Role", None).await.unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.failed, 0);
}
