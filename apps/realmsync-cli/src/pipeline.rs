//! Sheet-to-pass wiring
//!
//! Each pass reads the sheet(s) it needs, reshapes them into the rows the
//! reconciler expects and runs the matching reconciler method.

use std::path::Path;

use realmsync_sheet::{RecordSource, Row, SheetResult};
use tracing::info;

use crate::error::LoaderResult;
use crate::reconcile::columns::{DESCRIPTION, GROUP, NAME, ROLE, ROLE_DESCRIPTION, USERNAME};
use crate::reconcile::{ReconcileReport, Reconciler};

pub const ROLES_SHEET: &str = "Roles";
pub const GROUPS_SHEET: &str = "Groups";
pub const USERS_SHEET: &str = "Users";

/// Which passes a run performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Passes {
    pub groups: bool,
    pub users: bool,
    pub delete: bool,
}

impl Passes {
    /// No flag at all means roles, groups and users.
    pub fn is_default(&self) -> bool {
        !self.groups && !self.users && !self.delete
    }
}

/// Rows for the roles pass: `Role` and `Role description`.
pub fn role_rows(path: &Path) -> SheetResult<Vec<Row>> {
    let source = RecordSource::load(path, ROLES_SHEET)?;
    Ok(source.project(&[ROLE, ROLE_DESCRIPTION])?.into_rows())
}

/// Rows for the groups pass: one row per group name with every role
/// collected into the `Role` cell.
pub fn group_rows(path: &Path) -> SheetResult<Vec<Row>> {
    let source = RecordSource::load(path, GROUPS_SHEET)?;
    Ok(source
        .project(&[NAME, DESCRIPTION, ROLE])?
        .dedup()
        .group_by(NAME, ROLE)?
        .into_rows())
}

/// Rows for the users pass: each user joined with the roles of its group.
///
/// Users whose group is not on the Groups sheet keep an empty `Role`.
pub fn user_rows(path: &Path) -> SheetResult<Vec<Row>> {
    let mut source = RecordSource::load(path, GROUPS_SHEET)?;
    let group_roles = source
        .project(&[NAME, ROLE])?
        .rename(NAME, GROUP)?
        .group_by(GROUP, ROLE)?;

    source.switch_sheet(USERS_SHEET)?;
    let users = source.project(&[USERNAME, NAME, GROUP])?;

    Ok(users.left_join(&group_roles, GROUP)?.into_rows())
}

pub async fn create_roles(reconciler: &Reconciler, path: &Path) -> LoaderResult<ReconcileReport> {
    let rows = role_rows(path)?;
    reconciler
        .handle_roles(&rows, ROLE, Some(ROLE_DESCRIPTION))
        .await
}

pub async fn create_groups(reconciler: &Reconciler, path: &Path) -> LoaderResult<ReconcileReport> {
    let rows = group_rows(path)?;
    reconciler.manage_groups(&rows).await
}

pub async fn create_users(reconciler: &Reconciler, path: &Path) -> LoaderResult<ReconcileReport> {
    let rows = user_rows(path)?;
    reconciler.manage_users(&rows).await
}

/// Run the selected passes in order and collect their reports.
///
/// Sheet and listing failures stop the run; row failures are only
/// recorded in the reports.
pub async fn run(
    reconciler: &Reconciler,
    path: &Path,
    passes: Passes,
) -> LoaderResult<Vec<ReconcileReport>> {
    let mut reports = Vec::new();

    if passes.is_default() {
        info!(file = %path.display(), "loading roles, groups and users");
        reports.push(create_roles(reconciler, path).await?);
        reports.push(create_groups(reconciler, path).await?);
        reports.push(create_users(reconciler, path).await?);
        return Ok(reports);
    }

    if passes.groups {
        reports.push(create_groups(reconciler, path).await?);
    }
    if passes.users {
        reports.push(create_users(reconciler, path).await?);
    }
    if passes.delete {
        info!("deleting groups, users and roles");
        reports.push(reconciler.delete_groups().await?);
        reports.push(reconciler.delete_users().await?);
        reports.push(reconciler.delete_roles().await?);
    }

    Ok(reports)
}
