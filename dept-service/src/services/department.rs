use crate::models::{Department, DepartmentPatch, NewDepartment};
use crate::services::DepartmentRepository;
use service_core::error::AppError;
use service_core::response::CreateOutcome;
use std::sync::Arc;
use tracing::{info, instrument};

/// Department business rules: names are unique.
#[derive(Clone)]
pub struct DepartmentService {
    repo: Arc<dyn DepartmentRepository>,
}

impl DepartmentService {
    pub fn new(repo: Arc<dyn DepartmentRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), fields(name = %new.name))]
    pub async fn create(&self, new: NewDepartment) -> Result<CreateOutcome<Department>, AppError> {
        if let Some(existing) = self.repo.find_by_name(&new.name).await?.into_iter().next() {
            return Ok(CreateOutcome::AlreadyExists(existing));
        }

        let created = self.repo.insert(&Department::from(new)).await?;
        info!(dept_id = ?created.id, "Department created");
        Ok(CreateOutcome::Created(created))
    }

    pub async fn get(&self, id: i64) -> Result<Department, AppError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Department with ID {} not found", id)))
    }

    pub async fn list(&self) -> Result<Vec<Department>, AppError> {
        self.repo.list().await
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: DepartmentPatch) -> Result<Department, AppError> {
        self.get(id).await?;

        if let Some(name) = &patch.name {
            let clash = self
                .repo
                .find_by_name(name)
                .await?
                .into_iter()
                .any(|d| d.id != Some(id));
            if clash {
                return Err(AppError::bad_request(format!(
                    "Department name '{}' already exists",
                    name
                )));
            }
        }

        let updated = self.repo.update(id, &patch).await?;
        info!(dept_id = id, "Department updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.get(id).await?;

        if !self.repo.delete(id).await? {
            return Err(AppError::InternalError(anyhow::anyhow!(
                "Failed to delete department {}",
                id
            )));
        }

        info!(dept_id = id, "Department deleted");
        Ok(())
    }
}
