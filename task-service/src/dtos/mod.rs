//! Request parsing for task endpoints. Bodies may be JSON or form-encoded,
//! so every field is read loosely through [`Fields`].

use crate::models::{NewTask, TaskPatch, TaskStatus};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use service_core::error::AppError;
use service_core::extract::Fields;

const REQUIRED: [&str; 5] = ["task_name", "due_date", "description", "status", "owner_id"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%a %b %d %Y", "%b %d %Y"];

/// Parse a due date. Values without an offset are taken as UTC; bare dates
/// mean midnight.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, AppError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(naive.and_utc());
            }
        }
    }

    Err(AppError::bad_request(format!("Invalid due_date '{}'", raw)))
}

fn parse_status(fields: &Fields) -> Result<Option<TaskStatus>, AppError> {
    fields
        .text("status")
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse().map_err(AppError::bad_request))
        .transpose()
}

fn check_priority(priority: Option<i64>) -> Result<Option<i64>, AppError> {
    match priority {
        Some(p) if !(1..=10).contains(&p) => {
            Err(AppError::bad_request("priority must be between 1 and 10"))
        }
        other => Ok(other),
    }
}

fn non_blank(fields: &Fields, key: &str) -> Option<String> {
    fields
        .text(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a create body. Subtasks additionally require `parent_task`.
pub fn parse_create(fields: &Fields, subtask: bool) -> Result<NewTask, AppError> {
    let mut required: Vec<&str> = REQUIRED.to_vec();
    if subtask {
        required.push("parent_task");
    }
    let missing = fields.missing(&required);
    if !missing.is_empty() {
        return Err(AppError::bad_request(format!(
            "Missing required fields: {:?}",
            missing
        )));
    }

    let required_text = |key: &str| {
        non_blank(fields, key)
            .ok_or_else(|| AppError::bad_request(format!("{} cannot be empty", key)))
    };
    let required_int = |key: &str| {
        fields
            .int(key)?
            .ok_or_else(|| AppError::bad_request(format!("{} must be a valid integer", key)))
    };

    let task_name = required_text("task_name")?;
    let description = required_text("description")?;
    let due_date = parse_due_date(&required_text("due_date")?)?;
    let status = parse_status(fields)?
        .ok_or_else(|| AppError::bad_request("status cannot be empty"))?;
    let owner_id = required_int("owner_id")?;
    let parent_task = if subtask {
        Some(required_int("parent_task")?)
    } else {
        None
    };

    Ok(NewTask {
        task_name,
        description,
        due_date,
        status,
        owner_id,
        project_id: fields.int("project_id")?,
        collaborators: fields.int_list("collaborators")?.unwrap_or_default(),
        priority: check_priority(fields.int("priority")?)?,
        parent_task,
    })
}

/// Parse an update body. Unknown keys are ignored; blank strings count as
/// absent. An explicit `null` clears `project_id` or `priority`.
pub fn parse_update(fields: &Fields) -> Result<TaskPatch, AppError> {
    Ok(TaskPatch {
        task_name: non_blank(fields, "task_name"),
        description: non_blank(fields, "description"),
        due_date: non_blank(fields, "due_date")
            .map(|d| parse_due_date(&d))
            .transpose()?,
        status: parse_status(fields)?,
        owner_id: fields.int("owner_id")?,
        project_id: fields.nullable_int("project_id")?,
        collaborators: fields.int_list("collaborators")?,
        priority: fields
            .nullable_int("priority")?
            .map(check_priority)
            .transpose()?,
        ..Default::default()
    })
}

/// `GET /tasks` filters. Values that are not integers are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    owner_id: Option<String>,
    project_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub owner_id: Option<i64>,
    pub project_id: Option<i64>,
}

impl From<TaskListQuery> for TaskFilter {
    fn from(query: TaskListQuery) -> Self {
        let int = |v: Option<String>| v.and_then(|s| s.trim().parse().ok());
        TaskFilter {
            owner_id: int(query.owner_id),
            project_id: int(query.project_id),
        }
    }
}
