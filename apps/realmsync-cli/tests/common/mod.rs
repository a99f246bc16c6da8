//! Shared helpers for realmsync-cli integration tests.
//!
//! Every test gets its own mock admin API and, where needed, a temporary
//! CSV workbook.

#![allow(dead_code)]

use std::collections::HashMap;
use std::env::VarError;
use std::fs;
use std::sync::Once;

use realmsync_cli::api::{AccessToken, KeycloakClient, RealmPaths};
use realmsync_cli::config::LoaderConfig;
use realmsync_cli::reconcile::{Reconciler, UserDefaults};
use realmsync_sheet::{CellValue, Row};
use serde_json::Value;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REALM: &str = "test";
pub const TOKEN: &str = "test-token";

static INIT: Once = Once::new();

/// Initialize logging for tests (once).
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

pub struct TestContext {
    pub server: MockServer,
    pub paths: RealmPaths,
}

impl TestContext {
    pub async fn new() -> Self {
        init_test_logging();
        Self {
            server: MockServer::start().await,
            paths: RealmPaths::new(REALM),
        }
    }

    pub fn config(&self) -> LoaderConfig {
        config_for(&self.server.uri(), &[])
    }

    pub fn client(&self) -> KeycloakClient {
        KeycloakClient::new(&self.config(), &AccessToken::new("Bearer", TOKEN))
            .expect("client should build")
    }

    pub fn reconciler(&self) -> Reconciler {
        let config = self.config();
        Reconciler::new(self.client(), REALM, UserDefaults::from_config(&config))
    }

    /// Serve `body` for every GET of `endpoint`.
    pub async fn mock_get(&self, endpoint: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Serve `body` for the first GET of `endpoint` only; later calls fall
    /// through to lower-priority mocks.
    pub async fn mock_get_once(&self, endpoint: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .up_to_n_times(1)
            .with_priority(2)
            .mount(&self.server)
            .await;
    }

    /// Fail the test if any request with `verb` reaches the server.
    pub async fn forbid(&self, verb: &str) {
        Mock::given(method(verb))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(10)
            .expect(0)
            .named(format!("no {verb} requests"))
            .mount(&self.server)
            .await;
    }
}

pub fn make_reader(vars: HashMap<String, String>) -> impl Fn(&str) -> Result<String, VarError> {
    move |key: &str| vars.get(key).cloned().ok_or(VarError::NotPresent)
}

/// Config pointing at `host` with no request delay.
pub fn config_for(host: &str, extra: &[(&str, &str)]) -> LoaderConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("HOST".to_string(), host.to_string()),
        ("REALM".to_string(), REALM.to_string()),
        ("REQUEST_DELAY_MS".to_string(), "0".to_string()),
        ("REQUEST_TIMEOUT_SECS".to_string(), "5".to_string()),
    ]);
    for (k, v) in extra {
        vars.insert((*k).to_string(), (*v).to_string());
    }
    LoaderConfig::from_reader(make_reader(vars)).expect("test config should be valid")
}

/// Build a row; empty strings become empty cells.
pub fn row(cells: &[(&str, &str)]) -> Row {
    cells
        .iter()
        .map(|(k, v)| {
            let value = if v.is_empty() {
                CellValue::Empty
            } else {
                CellValue::from(*v)
            };
            (*k, value)
        })
        .collect()
}

/// Write a CSV workbook with the given `(sheet, contents)` pairs.
pub fn workbook(sheets: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    for (sheet, contents) in sheets {
        fs::write(dir.path().join(format!("{sheet}.csv")), contents).expect("write sheet");
    }
    dir
}

/// A small realm: two roles, two groups (one spread over merged rows),
/// two users.
pub fn realm_workbook() -> TempDir {
    workbook(&[
        (
            "Roles",
            "Role,Role description\nadmin,Full access\nviewer,\n",
        ),
        (
            "Groups",
            "Name,Description,Role\nops,Operations,admin\n,,viewer\ndev,Developers,viewer\n",
        ),
        ("Users", "Username,Name,Group\nann,Ann Lee,ops\nbob,Bob,dev\n"),
    ])
}
