use realmsync_sheet::Row;
use tracing::{error, info};

use super::{present_text, required_text, row_label, ReconcileReport, Reconciler, RowOutcome};
use crate::error::{LoaderResult, RowError};
use crate::models::RoleRepresentation;

impl Reconciler {
    /// Create or update one realm role per row.
    ///
    /// `name_field` names the role column; `desc_field`, when given, the
    /// description column. A missing or blank description is sent as `""`.
    pub async fn handle_roles(
        &self,
        rows: &[Row],
        name_field: &str,
        desc_field: Option<&str>,
    ) -> LoaderResult<ReconcileReport> {
        let existing: Vec<RoleRepresentation> = self.list(&self.paths.roles()).await?;
        let mut report = ReconcileReport::new("roles", rows.len());

        for (index, row) in rows.iter().enumerate() {
            match self.process_role(row, name_field, desc_field, &existing).await {
                Ok(outcome) => report.record(index, outcome),
                Err(e) => {
                    error!(row = index, error = %e, "failed to process role");
                    report.add_failure(index, row_label(row, name_field), e.to_string());
                }
            }
        }

        info!(summary = %report.summary(), "roles pass finished");
        Ok(report)
    }

    async fn process_role(
        &self,
        row: &Row,
        name_field: &str,
        desc_field: Option<&str>,
        existing: &[RoleRepresentation],
    ) -> Result<RowOutcome, RowError> {
        let name = required_text(row, name_field)?;
        let description = match desc_field {
            Some(field) if row.contains(field) => present_text(row, field)?,
            _ => String::new(),
        };
        let payload = RoleRepresentation::new(name.clone(), description);

        if existing.iter().any(|role| role.name == name) {
            self.client.put(&self.paths.role(&name), &payload).await?;
            Ok(RowOutcome::updated(name))
        } else {
            self.client.post(&self.paths.roles(), &payload).await?;
            Ok(RowOutcome::created(name))
        }
    }
}
