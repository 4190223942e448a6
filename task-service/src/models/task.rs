use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use service_core::time::now_iso8601;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Unassigned,
    Ongoing,
    #[serde(rename = "Under Review")]
    UnderReview,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Unassigned => "Unassigned",
            TaskStatus::Ongoing => "Ongoing",
            TaskStatus::UnderReview => "Under Review",
            TaskStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unassigned" => Ok(TaskStatus::Unassigned),
            "ongoing" => Ok(TaskStatus::Ongoing),
            "under review" => Ok(TaskStatus::UnderReview),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(format!(
                "Invalid status '{}'. Must be one of: Unassigned, Ongoing, Under Review, Completed",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    Parent,
    Subtask,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<i64>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A task row. Subtasks point at their parent through `parent_task`; the
/// parent keeps the child ids in `subtasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub owner_id: i64,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub collaborators: Vec<i64>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub parent_task: Option<i64>,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subtasks: Vec<i64>,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default = "now_iso8601")]
    pub created_at: String,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: None,
            owner_id: 0,
            task_name: String::new(),
            description: String::new(),
            due_date: None,
            collaborators: Vec::new(),
            status: TaskStatus::default(),
            project_id: None,
            parent_task: None,
            task_type: TaskType::default(),
            subtasks: Vec::new(),
            priority: None,
            completed_at: None,
            created_at: now_iso8601(),
        }
    }
}

impl Task {
    pub fn is_parent(&self) -> bool {
        self.task_type == TaskType::Parent
    }
}

/// Validated create payload. A `parent_task` makes it a subtask.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub task_name: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub status: TaskStatus,
    pub owner_id: i64,
    pub project_id: Option<i64>,
    pub collaborators: Vec<i64>,
    pub priority: Option<i64>,
    pub parent_task: Option<i64>,
}

impl From<NewTask> for Task {
    fn from(new: NewTask) -> Self {
        let mut collaborators = new.collaborators;
        let task_type = if new.parent_task.is_some() {
            // Subtask owners always collaborate on them.
            collaborators.push(new.owner_id);
            TaskType::Subtask
        } else {
            TaskType::Parent
        };
        let mut seen = std::collections::HashSet::new();
        collaborators.retain(|id| seen.insert(*id));

        Task {
            owner_id: new.owner_id,
            task_name: new.task_name,
            description: new.description,
            due_date: Some(new.due_date),
            collaborators,
            status: new.status,
            project_id: new.project_id,
            parent_task: new.parent_task,
            task_type,
            priority: new.priority,
            ..Default::default()
        }
    }
}

/// Fields to change on a task. The nullable columns distinguish "leave alone"
/// (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Stamp or clear `completed_at` when the status moves onto or off
    /// `Completed`.
    pub fn track_completion(&mut self, current: TaskStatus, now: DateTime<Utc>) {
        match self.status {
            Some(TaskStatus::Completed) if current != TaskStatus::Completed => {
                self.completed_at = Some(Some(now));
            }
            Some(next) if current == TaskStatus::Completed && next != TaskStatus::Completed => {
                self.completed_at = Some(None);
            }
            _ => {}
        }
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(v) = &self.task_name {
            task.task_name = v.clone();
        }
        if let Some(v) = &self.description {
            task.description = v.clone();
        }
        if let Some(v) = self.due_date {
            task.due_date = Some(v);
        }
        if let Some(v) = self.status {
            task.status = v;
        }
        if let Some(v) = self.owner_id {
            task.owner_id = v;
        }
        if let Some(v) = self.project_id {
            task.project_id = v;
        }
        if let Some(v) = &self.collaborators {
            task.collaborators = v.clone();
        }
        if let Some(v) = self.priority {
            task.priority = v;
        }
        if let Some(v) = &self.subtasks {
            task.subtasks = v.clone();
        }
        if let Some(v) = self.completed_at {
            task.completed_at = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn new_task(parent_task: Option<i64>) -> NewTask {
        NewTask {
            task_name: "Prepare Sprint Report".into(),
            description: "Compile metrics".into(),
            due_date: Utc.with_ymd_and_hms(2025, 9, 25, 17, 0, 0).unwrap(),
            status: TaskStatus::Unassigned,
            owner_id: 101,
            project_id: None,
            collaborators: vec![102, 103, 102],
            priority: Some(5),
            parent_task,
        }
    }

    #[test]
    fn status_uses_display_names_on_the_wire() {
        assert_eq!(
            serde_json::to_value(TaskStatus::UnderReview).unwrap(),
            json!("Under Review")
        );
        assert_eq!("under review".parse::<TaskStatus>(), Ok(TaskStatus::UnderReview));
        assert!("Done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn parent_task_payload_shape() {
        let value = serde_json::to_value(Task::from(new_task(None))).unwrap();

        assert!(value.get("id").is_none());
        assert_eq!(value["type"], "parent");
        assert_eq!(value["collaborators"], json!([102, 103]));
        assert_eq!(value["due_date"], "2025-09-25T17:00:00Z");
        assert!(value["completed_at"].is_null());
    }

    #[test]
    fn subtask_owner_joins_collaborators() {
        let task = Task::from(new_task(Some(4)));

        assert_eq!(task.task_type, TaskType::Subtask);
        assert_eq!(task.parent_task, Some(4));
        assert_eq!(task.collaborators, vec![102, 103, 101]);
    }

    #[test]
    fn stored_nulls_read_as_empty_lists() {
        let task: Task = serde_json::from_value(json!({
            "id": 5,
            "owner_id": 101,
            "task_name": "x",
            "collaborators": null,
            "subtasks": null,
            "status": "Ongoing",
            "due_date": "2025-09-25T17:00:00+00:00",
            "created_at": "2025-09-18T15:48:32.245055+00:00"
        }))
        .unwrap();

        assert!(task.collaborators.is_empty());
        assert!(task.subtasks.is_empty());
        assert!(task.is_parent());
    }

    #[test]
    fn completing_stamps_and_reopening_clears() {
        let now = Utc::now();

        let mut patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        patch.track_completion(TaskStatus::Ongoing, now);
        assert_eq!(patch.completed_at, Some(Some(now)));

        let mut patch = TaskPatch {
            status: Some(TaskStatus::Ongoing),
            ..Default::default()
        };
        patch.track_completion(TaskStatus::Completed, now);
        assert_eq!(patch.completed_at, Some(None));
        assert_eq!(serde_json::to_value(&patch).unwrap()["completed_at"], json!(null));

        let mut patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        patch.track_completion(TaskStatus::Completed, now);
        assert_eq!(patch.completed_at, None);
    }
}
