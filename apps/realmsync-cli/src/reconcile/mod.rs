//! Create-or-update reconciliation of sheet rows against a realm.
//!
//! Every pass lists the remote collection once, matches each row by its
//! natural key (role name, group name, username) and either replaces the
//! remote object or creates it. A failing row is logged and recorded; the
//! pass continues with the next one. Only a failed listing aborts a pass.

mod delete;
mod groups;
mod report;
mod roles;
mod users;

pub use report::{ItemResult, ItemStatus, ReconcileReport, RowOutcome};
pub use users::composite_group_name;

use realmsync_sheet::Row;
use secrecy::{ExposeSecret, SecretString};
use tracing::error;

use crate::api::{AdminAuthenticator, KeycloakClient, RealmPaths};
use crate::config::LoaderConfig;
use crate::error::{LoaderResult, RowError};
use crate::models::RemoteEntity;

/// Sheet column names the reconciler reads.
pub mod columns {
    pub const ROLE: &str = "Role";
    pub const ROLE_DESCRIPTION: &str = "Role description";
    pub const NAME: &str = "Name";
    pub const DESCRIPTION: &str = "Description";
    pub const USERNAME: &str = "Username";
    pub const GROUP: &str = "Group";
}

/// Initial credential for users created by the users pass.
#[derive(Debug)]
pub struct UserDefaults {
    pub password: SecretString,
    pub temporary: bool,
}

impl UserDefaults {
    pub fn from_config(config: &LoaderConfig) -> Self {
        Self {
            password: SecretString::from(config.default_user_password.expose_secret().to_string()),
            temporary: config.temporary_password,
        }
    }
}

/// Applies sheet rows to one realm through an authenticated client.
#[derive(Debug)]
pub struct Reconciler {
    client: KeycloakClient,
    paths: RealmPaths,
    defaults: UserDefaults,
}

impl Reconciler {
    pub fn new(client: KeycloakClient, realm: &str, defaults: UserDefaults) -> Self {
        Self {
            client,
            paths: RealmPaths::new(realm),
            defaults,
        }
    }

    /// Authenticate as the master-realm administrator and build a reconciler
    /// for the configured realm.
    pub async fn connect(config: &LoaderConfig) -> LoaderResult<Self> {
        let token = AdminAuthenticator::new(config)?.authorize().await?;
        let client = KeycloakClient::new(config, &token)?;
        Ok(Self::new(
            client,
            &config.realm,
            UserDefaults::from_config(config),
        ))
    }

    /// One listing call. Failure aborts the calling pass.
    async fn list<T: RemoteEntity>(&self, endpoint: &str) -> LoaderResult<Vec<T>> {
        self.client.get(endpoint).await.map_err(|e| {
            error!(kind = T::KIND, endpoint, error = %e, "failed to list remote objects");
            e.into()
        })
    }

    /// Look up the server id of the object named `key` with a fresh listing.
    async fn resolve_id<T: RemoteEntity>(
        &self,
        endpoint: &str,
        key: &str,
    ) -> Result<String, RowError> {
        let objects: Vec<T> = self.client.get(endpoint).await?;
        objects
            .iter()
            .find(|o| o.key() == key)
            .and_then(|o| o.id())
            .map(str::to_string)
            .ok_or_else(|| RowError::NotFound(format!("{} '{}'", T::KIND, key)))
    }
}

/// Text of a required cell. Missing column and empty value are both errors.
fn required_text(row: &Row, field: &str) -> Result<String, RowError> {
    let cell = row.require(field)?;
    cell.as_text()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| RowError::Format(format!("field '{field}' is empty")))
}

/// Text of a cell that must exist as a column but may be blank.
fn present_text(row: &Row, field: &str) -> Result<String, RowError> {
    let cell = row.require(field)?;
    Ok(cell.as_text().map(|t| t.trim().to_string()).unwrap_or_default())
}

/// Best-effort label for a row in reports.
fn row_label(row: &Row, field: &str) -> String {
    row.get(field)
        .and_then(|c| c.as_text())
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| "<unnamed>".to_string())
}

fn existing_id<'a, T: RemoteEntity>(object: &'a T) -> Result<&'a str, RowError> {
    object
        .id()
        .ok_or_else(|| RowError::Format(format!("{} '{}' has no id", T::KIND, object.key())))
}
