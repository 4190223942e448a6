use crate::dtos::TaskFilter;
use crate::models::{NewTask, Task, TaskPatch};
use crate::services::TaskRepository;
use chrono::Utc;
use serde::{ser, Serialize, Serializer};
use serde_json::Value;
use service_core::error::AppError;
use service_core::response::CreateOutcome;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A parent task with its subtask records in place of their ids.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTree {
    pub task: Task,
    pub subtasks: Vec<Task>,
}

impl Serialize for TaskTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut value = serde_json::to_value(&self.task).map_err(ser::Error::custom)?;
        if let Value::Object(map) = &mut value {
            let subtasks = serde_json::to_value(&self.subtasks).map_err(ser::Error::custom)?;
            map.insert("subtasks".to_string(), subtasks);
        }
        value.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedSubtask {
    pub subtask_id: i64,
    pub error: String,
}

/// Children listed on a parent, resolved one by one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtaskListing {
    pub parent_task_id: i64,
    pub subtasks: Vec<Task>,
    pub subtask_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_subtasks: Vec<FailedSubtask>,
}

fn not_found(id: i64) -> AppError {
    AppError::not_found(format!("Task with ID {} not found", id))
}

#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    /// Task names are unique per owner; a clash returns the existing rows.
    #[instrument(skip(self, new), fields(owner_id = new.owner_id, task_name = %new.task_name))]
    pub async fn create(&self, new: NewTask) -> Result<CreateOutcome<Task, Vec<Task>>, AppError> {
        let existing = self
            .repo
            .find_by_owner_and_name(new.owner_id, &new.task_name)
            .await?;
        if !existing.is_empty() {
            return Ok(CreateOutcome::AlreadyExists(existing));
        }

        let created = self.repo.insert(&Task::from(new)).await?;
        info!(task_id = ?created.id, task_type = ?created.task_type, "Task created");
        Ok(CreateOutcome::Created(created))
    }

    /// Create a subtask and record it on its parent. A failure to update the
    /// parent does not undo the subtask.
    pub async fn create_subtask(
        &self,
        new: NewTask,
    ) -> Result<CreateOutcome<Task, Vec<Task>>, AppError> {
        let parent_id = new
            .parent_task
            .ok_or_else(|| AppError::bad_request("parent_task is required for subtasks"))?;
        let parent = self.repo.get(parent_id).await?.ok_or_else(|| {
            AppError::bad_request(format!("Parent task with ID {} not found", parent_id))
        })?;

        let outcome = self.create(new).await?;

        if let CreateOutcome::Created(subtask) = &outcome {
            if let Some(subtask_id) = subtask.id {
                let mut subtasks = parent.subtasks;
                if !subtasks.contains(&subtask_id) {
                    subtasks.push(subtask_id);
                }
                let patch = TaskPatch {
                    subtasks: Some(subtasks),
                    ..Default::default()
                };
                if let Err(e) = self.repo.update(parent_id, &patch).await {
                    warn!(
                        parent_id,
                        subtask_id,
                        error = %e,
                        "Failed to record subtask on parent task"
                    );
                }
            }
        }

        Ok(outcome)
    }

    pub async fn get(&self, id: i64) -> Result<Task, AppError> {
        self.repo.get(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, AppError> {
        self.repo.list(filter).await
    }

    /// Parent tasks the user owns or collaborates on, each with its subtasks.
    pub async fn tasks_for_user(&self, user_id: i64) -> Result<Vec<TaskTree>, AppError> {
        let parents = self.repo.find_parent_tasks_by_user(user_id).await?;
        if parents.is_empty() {
            return Err(AppError::not_found(format!(
                "No tasks found for user ID {}",
                user_id
            )));
        }

        let mut trees = Vec::with_capacity(parents.len());
        for task in parents {
            let subtasks = match task.id {
                Some(id) => self.repo.find_subtasks_by_parent(id).await?,
                None => Vec::new(),
            };
            trees.push(TaskTree { task, subtasks });
        }
        Ok(trees)
    }

    pub async fn subtasks_of(&self, parent_id: i64) -> Result<SubtaskListing, AppError> {
        let parent = self.repo.get(parent_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Parent task with ID {} not found", parent_id))
        })?;

        let mut subtasks = Vec::new();
        let mut failed_subtasks = Vec::new();
        for subtask_id in parent.subtasks {
            match self.repo.get(subtask_id).await {
                Ok(Some(task)) => subtasks.push(task),
                Ok(None) => failed_subtasks.push(FailedSubtask {
                    subtask_id,
                    error: "Subtask not found".to_string(),
                }),
                Err(e) => failed_subtasks.push(FailedSubtask {
                    subtask_id,
                    error: e.to_string(),
                }),
            }
        }

        Ok(SubtaskListing {
            parent_task_id: parent_id,
            subtask_count: subtasks.len(),
            subtasks,
            failed_subtasks,
        })
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, mut patch: TaskPatch) -> Result<Task, AppError> {
        let current = self.get(id).await?;

        if patch.is_empty() {
            return Err(AppError::bad_request("No fields to update provided"));
        }

        patch.track_completion(current.status, Utc::now());

        let updated = self.repo.update(id, &patch).await?;
        info!(task_id = id, status = %updated.status, "Task updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskStatus, TaskType};
    use crate::services::InMemoryTaskRepository;
    use chrono::TimeZone;

    fn new_task(name: &str, owner_id: i64, parent_task: Option<i64>) -> NewTask {
        NewTask {
            task_name: name.into(),
            description: "desc".into(),
            due_date: Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0).unwrap(),
            status: TaskStatus::Ongoing,
            owner_id,
            project_id: None,
            collaborators: Vec::new(),
            priority: None,
            parent_task,
        }
    }

    fn created(outcome: CreateOutcome<Task, Vec<Task>>) -> Task {
        match outcome {
            CreateOutcome::Created(task) => task,
            CreateOutcome::AlreadyExists(_) => panic!("expected a new task"),
        }
    }

    #[tokio::test]
    async fn subtask_is_recorded_on_parent() {
        let service = TaskService::new(Arc::new(InMemoryTaskRepository::new()));
        let parent = created(service.create(new_task("Parent", 1, None)).await.unwrap());
        let parent_id = parent.id.unwrap();

        let child = created(
            service
                .create_subtask(new_task("Child", 2, Some(parent_id)))
                .await
                .unwrap(),
        );

        assert_eq!(child.task_type, TaskType::Subtask);
        assert_eq!(
            service.get(parent_id).await.unwrap().subtasks,
            vec![child.id.unwrap()]
        );
    }

    #[tokio::test]
    async fn subtask_with_unknown_parent_is_bad_request() {
        let service = TaskService::new(Arc::new(InMemoryTaskRepository::new()));

        let err = service
            .create_subtask(new_task("Child", 2, Some(77)))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Bad request: Parent task with ID 77 not found");
    }

    #[tokio::test]
    async fn user_tree_covers_owned_and_shared_parents() {
        let service = TaskService::new(Arc::new(InMemoryTaskRepository::new()));
        let owned = created(service.create(new_task("Mine", 5, None)).await.unwrap());
        let mut shared = new_task("Shared", 6, None);
        shared.collaborators = vec![5];
        created(service.create(shared).await.unwrap());
        created(service.create(new_task("Other", 7, None)).await.unwrap());
        service
            .create_subtask(new_task("Step", 5, owned.id))
            .await
            .unwrap();

        let trees = service.tasks_for_user(5).await.unwrap();

        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].subtasks.len(), 1);
        let json = serde_json::to_value(&trees[0]).unwrap();
        assert_eq!(json["subtasks"][0]["task_name"], "Step");
    }

    #[tokio::test]
    async fn missing_children_are_reported() {
        let repo = Arc::new(InMemoryTaskRepository::new());
        let service = TaskService::new(repo.clone());
        let parent = created(service.create(new_task("Parent", 1, None)).await.unwrap());
        let a = created(service.create_subtask(new_task("A", 1, parent.id)).await.unwrap());
        created(service.create_subtask(new_task("B", 1, parent.id)).await.unwrap());
        repo.remove(a.id.unwrap()).await;

        let listing = service.subtasks_of(parent.id.unwrap()).await.unwrap();

        assert_eq!(listing.subtask_count, 1);
        assert_eq!(listing.failed_subtasks[0].subtask_id, a.id.unwrap());
    }

    #[tokio::test]
    async fn completing_a_task_sets_completed_at() {
        let service = TaskService::new(Arc::new(InMemoryTaskRepository::new()));
        let task = created(service.create(new_task("Ship", 1, None)).await.unwrap());
        let id = task.id.unwrap();

        let done = service
            .update(
                id,
                TaskPatch {
                    status: Some(TaskStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(done.completed_at.is_some());

        let reopened = service
            .update(
                id,
                TaskPatch {
                    status: Some(TaskStatus::Ongoing),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(reopened.completed_at.is_none());
    }
}
