use crate::models::{NewTeam, Team, TeamPatch};
use crate::services::TeamRepository;
use service_core::error::AppError;
use service_core::response::CreateOutcome;
use std::sync::Arc;
use tracing::{info, instrument};

/// Team rules: a name is unique within its department.
#[derive(Clone)]
pub struct TeamService {
    repo: Arc<dyn TeamRepository>,
}

fn not_found(id: i64) -> AppError {
    AppError::not_found(format!("Team with ID {} not found", id))
}

impl TeamService {
    pub fn new(repo: Arc<dyn TeamRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), fields(name = %new.name, dept_id = new.dept_id))]
    pub async fn create(&self, new: NewTeam) -> Result<CreateOutcome<Team>, AppError> {
        let existing = self.repo.find_by_name_in_dept(&new.name, new.dept_id).await?;
        if let Some(team) = existing.into_iter().next() {
            return Ok(CreateOutcome::AlreadyExists(team));
        }

        let created = self.repo.insert(&Team::from(new)).await?;
        info!(team_id = ?created.id, "Team created");
        Ok(CreateOutcome::Created(created))
    }

    pub async fn get(&self, id: i64, with_dept: bool) -> Result<Team, AppError> {
        self.repo
            .get(id, with_dept)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn list(&self, with_dept: bool) -> Result<Vec<Team>, AppError> {
        self.repo.list(with_dept).await
    }

    pub async fn list_by_dept(&self, dept_id: i64, with_dept: bool) -> Result<Vec<Team>, AppError> {
        self.repo.list_by_dept(dept_id, with_dept).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: TeamPatch) -> Result<Team, AppError> {
        let current = self.get(id, false).await?;

        if let Some(name) = &patch.name {
            let dept_id = patch.dept_id.unwrap_or(current.dept_id);
            let clash = self
                .repo
                .find_by_name_in_dept(name, dept_id)
                .await?
                .into_iter()
                .any(|t| t.id != Some(id));
            if clash {
                return Err(AppError::bad_request(format!(
                    "Team name '{}' already exists in this department",
                    name
                )));
            }
        }

        let updated = self.repo.update(id, &patch).await?;
        info!(team_id = id, "Team updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.get(id, false).await?;

        if !self.repo.delete(id).await? {
            return Err(AppError::InternalError(anyhow::anyhow!(
                "Failed to delete team {}",
                id
            )));
        }

        info!(team_id = id, "Team deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeptInfo;
    use crate::services::InMemoryTeamRepository;

    fn new(name: &str, dept_id: i64) -> NewTeam {
        NewTeam {
            name: name.into(),
            dept_id,
        }
    }

    #[tokio::test]
    async fn same_name_in_other_department_is_allowed() {
        let service = TeamService::new(Arc::new(InMemoryTeamRepository::new()));
        service.create(new("Core", 1)).await.unwrap();

        let outcome = service.create(new("Core", 2)).await.unwrap();
        assert!(matches!(outcome, CreateOutcome::Created(_)));

        let outcome = service.create(new("Core", 1)).await.unwrap();
        assert!(matches!(outcome, CreateOutcome::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn moving_into_department_with_same_name_fails() {
        let service = TeamService::new(Arc::new(InMemoryTeamRepository::new()));
        service.create(new("Core", 1)).await.unwrap();
        service.create(new("Core", 2)).await.unwrap();

        let err = service
            .update(
                2,
                TeamPatch {
                    name: Some("Core".into()),
                    dept_id: Some(1),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Bad request: Team name 'Core' already exists in this department"
        );
    }

    #[tokio::test]
    async fn department_is_embedded_on_request() {
        let repo = InMemoryTeamRepository::with_departments([DeptInfo {
            id: 1,
            name: "Engineering".into(),
        }]);
        let service = TeamService::new(Arc::new(repo));
        service.create(new("Core", 1)).await.unwrap();

        assert!(service.get(1, false).await.unwrap().dept.is_none());
        assert_eq!(
            service.get(1, true).await.unwrap().dept.map(|d| d.name),
            Some("Engineering".to_string())
        );
    }
}
