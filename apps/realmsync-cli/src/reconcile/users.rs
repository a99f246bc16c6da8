use realmsync_sheet::Row;
use secrecy::ExposeSecret;
use tracing::{debug, error, info, warn};

use super::columns::{GROUP, NAME, ROLE, USERNAME};
use super::{existing_id, required_text, row_label, ReconcileReport, Reconciler, RowOutcome};
use crate::error::{LoaderResult, RowError};
use crate::models::{split_name, GroupRepresentation, UserRepresentation};

/// Name of the group that grants `role` within `group`, e.g. `ops-admin`.
pub fn composite_group_name(group: &str, role: &str) -> String {
    format!("{group}-{role}")
}

impl Reconciler {
    /// Create or update one user per row.
    ///
    /// Newly created users are added to `{Group}-{Role}` for every role in
    /// the row's `Role` cell. Existing users keep their memberships.
    pub async fn manage_users(&self, rows: &[Row]) -> LoaderResult<ReconcileReport> {
        let existing: Vec<UserRepresentation> = self.list(&self.paths.users()).await?;
        let mut report = ReconcileReport::new("users", rows.len());

        for (index, row) in rows.iter().enumerate() {
            match self.process_user(row, &existing).await {
                Ok(outcome) => report.record(index, outcome),
                Err(e) => {
                    error!(row = index, error = %e, "failed to process user");
                    report.add_failure(index, row_label(row, USERNAME), e.to_string());
                }
            }
        }

        info!(summary = %report.summary(), "users pass finished");
        Ok(report)
    }

    async fn process_user(
        &self,
        row: &Row,
        existing: &[UserRepresentation],
    ) -> Result<RowOutcome, RowError> {
        let username = required_text(row, USERNAME)?;
        let full_name = required_text(row, NAME)?;
        let (first_name, last_name) = split_name(&full_name);
        let payload = UserRepresentation::new(
            username.clone(),
            first_name,
            last_name,
            self.defaults.password.expose_secret(),
            self.defaults.temporary,
        );

        match existing.iter().find(|user| user.username == username) {
            Some(user) => {
                let id = existing_id(user)?;
                self.client.put(&self.paths.user(id), &payload).await?;
                Ok(RowOutcome::updated(username))
            }
            None => {
                self.client.post(&self.paths.users(), &payload).await?;
                let warnings = self.assign_groups_to_user(row, &username).await;
                Ok(RowOutcome::created(username).with_warnings(warnings))
            }
        }
    }

    /// Wire a freshly created user into its composite groups.
    ///
    /// Returns one warning per step that failed.
    async fn assign_groups_to_user(&self, row: &Row, username: &str) -> Vec<String> {
        let group = match required_text(row, GROUP) {
            Ok(group) => group,
            Err(e) => {
                warn!(user = %username, error = %e, "user row has no group");
                return vec![e.to_string()];
            }
        };
        let roles = match row.require(ROLE) {
            Ok(cell) => cell.values(),
            Err(e) => {
                warn!(user = %username, group = %group, error = %e, "user row has no roles");
                return vec![e.to_string()];
            }
        };
        if roles.is_empty() {
            warn!(user = %username, group = %group, "no roles found for the user's group");
            return vec![format!("group '{group}' has no roles")];
        }

        let user_id = match self
            .resolve_id::<UserRepresentation>(&self.paths.users(), username)
            .await
        {
            Ok(id) => id,
            Err(e) => {
                error!(user = %username, error = %e, "failed to resolve user id");
                return vec![e.to_string()];
            }
        };

        let mut warnings = Vec::new();
        for role in roles {
            let composite = composite_group_name(&group, &role);
            if let Err(e) = self.update_user_groups(&user_id, &composite).await {
                error!(user = %username, group = %composite, error = %e, "failed to add user to group");
                warnings.push(format!("group '{composite}': {e}"));
            }
        }
        warnings
    }

    /// Add user `user_id` to every group named exactly `group_name`,
    /// unless the user is already a member.
    pub async fn update_user_groups(&self, user_id: &str, group_name: &str) -> Result<(), RowError> {
        let assigned: Vec<GroupRepresentation> =
            self.client.get(&self.paths.user_groups(user_id)).await?;
        if assigned.iter().any(|g| g.name == group_name) {
            debug!(user_id, group = group_name, "already a member");
            return Ok(());
        }

        let found: Vec<GroupRepresentation> = self
            .client
            .search(&self.paths.groups(), &[("search", group_name)])
            .await?;
        let matches: Vec<&GroupRepresentation> =
            found.iter().filter(|g| g.name == group_name).collect();
        if matches.is_empty() {
            return Err(RowError::NotFound(format!("group '{group_name}'")));
        }

        for group in matches {
            let group_id = existing_id(group)?;
            self.client
                .put_empty(&self.paths.user_group(user_id, group_id))
                .await?;
            info!(user_id, group = group_name, "user added to group");
        }
        Ok(())
    }
}
