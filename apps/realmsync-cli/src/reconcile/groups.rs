use realmsync_sheet::Row;
use tracing::{debug, error, info, warn};

use super::columns::{DESCRIPTION, NAME, ROLE};
use super::{
    existing_id, present_text, required_text, row_label, ReconcileReport, Reconciler, RowOutcome,
};
use crate::error::{LoaderResult, RowError};
use crate::models::{GroupRepresentation, RoleMapping, RoleRepresentation};

impl Reconciler {
    /// Create or update one group per row, then wire each of the row's
    /// roles to it.
    ///
    /// Rows carry `Name`, `Description` and `Role`, where `Role` may hold
    /// several newline-separated or aggregated names.
    pub async fn manage_groups(&self, rows: &[Row]) -> LoaderResult<ReconcileReport> {
        let existing: Vec<GroupRepresentation> = self.list(&self.paths.groups()).await?;
        let mut report = ReconcileReport::new("groups", rows.len());

        for (index, row) in rows.iter().enumerate() {
            match self.process_group(row, &existing).await {
                Ok(outcome) => report.record(index, outcome),
                Err(e) => {
                    error!(row = index, error = %e, "failed to process group");
                    report.add_failure(index, row_label(row, NAME), e.to_string());
                }
            }
        }

        info!(summary = %report.summary(), "groups pass finished");
        Ok(report)
    }

    async fn process_group(
        &self,
        row: &Row,
        existing: &[GroupRepresentation],
    ) -> Result<RowOutcome, RowError> {
        let name = required_text(row, NAME)?;
        let description = present_text(row, DESCRIPTION)?;
        let payload = GroupRepresentation::new(name.clone(), description);

        let outcome = match existing.iter().find(|group| group.name == name) {
            Some(group) => {
                let id = existing_id(group)?;
                self.client.put(&self.paths.group(id), &payload).await?;
                RowOutcome::updated(name.clone())
            }
            None => {
                self.client.post(&self.paths.groups(), &payload).await?;
                RowOutcome::created(name.clone())
            }
        };

        let mut warnings = Vec::new();
        match row.require(ROLE) {
            Ok(cell) => {
                for role in cell.values() {
                    if let Err(e) = self.update_assigned_roles(&name, &role).await {
                        error!(group = %name, role = %role, error = %e, "failed to assign role to group");
                        warnings.push(format!("role '{role}': {e}"));
                    }
                }
            }
            Err(e) => {
                warn!(group = %name, error = %e, "group row has no role column");
                warnings.push(e.to_string());
            }
        }

        Ok(outcome.with_warnings(warnings))
    }

    /// Map realm role `role` onto group `group_name` unless it already is.
    pub async fn update_assigned_roles(&self, group_name: &str, role: &str) -> Result<(), RowError> {
        let group_id = self
            .resolve_id::<GroupRepresentation>(&self.paths.groups(), group_name)
            .await?;

        let group: GroupRepresentation = self.client.get(&self.paths.group(&group_id)).await?;
        if group.has_realm_role(role) {
            debug!(group = %group_name, role, "role already assigned");
            return Ok(());
        }

        let remote: RoleRepresentation = self.client.get(&self.paths.role(role)).await?;
        let role_id = remote
            .id
            .clone()
            .ok_or_else(|| RowError::Format(format!("role '{role}' has no id")))?;
        let mapping = [RoleMapping {
            id: role_id,
            name: remote.name,
        }];

        self.client
            .post(&self.paths.group_realm_roles(&group_id), &mapping)
            .await?;
        info!(group = %group_name, role, "role assigned to group");
        Ok(())
    }
}
