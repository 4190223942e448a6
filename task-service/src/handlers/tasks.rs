use crate::dtos::{parse_create, parse_update, TaskListQuery};
use crate::models::Task;
use crate::services::{SubtaskListing, TaskTree};
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use service_core::error::AppError;
use service_core::extract::{Fields, PathParam, Payload};
use service_core::response::{ApiResponse, CreateOutcome};

fn created_response(outcome: CreateOutcome<Task, Vec<Task>>) -> Response {
    match outcome {
        CreateOutcome::Created(task) => ApiResponse::created(
            format!("Task created! Task ID: {}", task.id.unwrap_or_default()),
            task,
        )
        .into_response(),
        CreateOutcome::AlreadyExists(existing) => {
            let name = existing
                .first()
                .map(|t| t.task_name.clone())
                .unwrap_or_default();
            ApiResponse::ok(
                format!("Task '{}' already exists for this user.", name),
                existing,
            )
            .into_response()
        }
    }
}

pub async fn create_task(
    State(state): State<AppState>,
    Payload(fields): Payload<Fields>,
) -> Result<Response, AppError> {
    let new = parse_create(&fields, false)?;
    let outcome = state.tasks.create(new).await?;
    Ok(created_response(outcome))
}

pub async fn create_subtask(
    State(state): State<AppState>,
    Payload(fields): Payload<Fields>,
) -> Result<Response, AppError> {
    let new = parse_create(&fields, true)?;
    let outcome = state.tasks.create_subtask(new).await?;
    Ok(created_response(outcome))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> Result<ApiResponse<Vec<Task>>, AppError> {
    let tasks = state.tasks.list(query.into()).await?;
    Ok(ApiResponse::ok("Tasks retrieved successfully", tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<ApiResponse<Task>, AppError> {
    let task = state.tasks.get(id).await?;
    Ok(ApiResponse::ok("Task retrieved successfully", task))
}

pub async fn list_tasks_for_user(
    State(state): State<AppState>,
    PathParam(user_id): PathParam<i64>,
) -> Result<ApiResponse<Vec<TaskTree>>, AppError> {
    let trees = state.tasks.tasks_for_user(user_id).await?;
    Ok(ApiResponse::ok(
        format!("Retrieved {} task(s) for user ID {}", trees.len(), user_id),
        trees,
    ))
}

pub async fn list_subtasks(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<ApiResponse<SubtaskListing>, AppError> {
    let listing = state.tasks.subtasks_of(id).await?;

    let found = listing.subtask_count;
    let failed = listing.failed_subtasks.len();
    let (status, message) = match (found, failed) {
        (0, 0) => (
            StatusCode::OK,
            format!("No subtasks found for parent task {}", id),
        ),
        (0, _) => (
            StatusCode::NOT_FOUND,
            format!("No valid subtasks found for parent task {}", id),
        ),
        (_, 0) => (
            StatusCode::OK,
            format!("Successfully retrieved {} subtasks for parent task {}", found, id),
        ),
        _ => (
            StatusCode::MULTI_STATUS,
            format!(
                "Retrieved {} subtasks for parent task {}, {} failed",
                found, id, failed
            ),
        ),
    };

    Ok(ApiResponse::new(status, message).with_data(listing))
}

pub async fn update_task(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    Payload(fields): Payload<Fields>,
) -> Result<ApiResponse<Task>, AppError> {
    let patch = parse_update(&fields)?;
    let task = state.tasks.update(id, patch).await?;
    Ok(ApiResponse::ok(format!("Task {} updated successfully", id), task))
}
