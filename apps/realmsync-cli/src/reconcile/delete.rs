use tracing::{error, info, warn};

use super::{ReconcileReport, Reconciler};
use crate::error::LoaderResult;
use crate::models::{GroupRepresentation, RemoteEntity, RoleRepresentation, UserRepresentation};

impl Reconciler {
    /// Delete every group in the realm.
    pub async fn delete_groups(&self) -> LoaderResult<ReconcileReport> {
        self.delete_all::<GroupRepresentation, _>("delete groups", &self.paths.groups(), |id| {
            self.paths.group(id)
        })
        .await
    }

    /// Delete every user in the realm.
    pub async fn delete_users(&self) -> LoaderResult<ReconcileReport> {
        self.delete_all::<UserRepresentation, _>("delete users", &self.paths.users(), |id| {
            self.paths.user(id)
        })
        .await
    }

    /// Delete every realm role, built-in ones included.
    pub async fn delete_roles(&self) -> LoaderResult<ReconcileReport> {
        self.delete_all::<RoleRepresentation, _>("delete roles", &self.paths.roles(), |id| {
            self.paths.role_by_id(id)
        })
        .await
    }

    async fn delete_all<T, F>(
        &self,
        operation: &str,
        list_endpoint: &str,
        item_endpoint: F,
    ) -> LoaderResult<ReconcileReport>
    where
        T: RemoteEntity,
        F: Fn(&str) -> String,
    {
        let objects: Vec<T> = self.list(list_endpoint).await?;
        let mut report = ReconcileReport::new(operation, objects.len());

        for (index, object) in objects.iter().enumerate() {
            let name = object.key().to_string();
            let Some(id) = object.id() else {
                warn!(kind = T::KIND, name = %name, "object has no id");
                report.add_skipped(index, name, "no id".to_string());
                continue;
            };

            match self.client.delete(&item_endpoint(id)).await {
                Ok(()) => report.add_deleted(index, name),
                Err(e) => {
                    error!(kind = T::KIND, name = %name, error = %e, "failed to delete");
                    report.add_failure(index, name, e.to_string());
                }
            }
        }

        info!(summary = %report.summary(), "{} finished", operation);
        Ok(report)
    }
}
