use crate::dtos::{parse_create, parse_update};
use crate::models::Department;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use service_core::error::AppError;
use service_core::extract::{Fields, PathParam, Payload};
use service_core::response::{ApiResponse, CreateOutcome};

pub async fn create_department(
    State(state): State<AppState>,
    Payload(fields): Payload<Fields>,
) -> Result<Response, AppError> {
    let new = parse_create(&fields)?;

    let response = match state.departments.create(new).await? {
        CreateOutcome::Created(dept) => ApiResponse::created(
            format!(
                "Department created! Department ID: {}",
                dept.id.unwrap_or_default()
            ),
            dept,
        ),
        CreateOutcome::AlreadyExists(dept) => ApiResponse::ok(
            format!("Department '{}' already exists.", dept.name),
            dept,
        ),
    };

    Ok(response.into_response())
}

pub async fn list_departments(
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<Department>>, AppError> {
    let departments = state.departments.list().await?;
    Ok(ApiResponse::ok(
        format!("Retrieved {} department(s)", departments.len()),
        departments,
    ))
}

pub async fn get_department(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<ApiResponse<Department>, AppError> {
    let dept = state.departments.get(id).await?;
    Ok(ApiResponse::ok("Department retrieved successfully", dept))
}

/// Teams live in their own service; this answers with the department record.
pub async fn get_department_teams(
    state: State<AppState>,
    id: PathParam<i64>,
) -> Result<ApiResponse<Department>, AppError> {
    get_department(state, id).await
}

pub async fn update_department(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    Payload(fields): Payload<Fields>,
) -> Result<ApiResponse<Department>, AppError> {
    let patch = parse_update(&fields)?;
    if patch.is_empty() {
        return Err(AppError::bad_request("No fields to update provided"));
    }

    let dept = state.departments.update(id, patch).await?;
    Ok(ApiResponse::ok(
        format!("Department {} updated successfully", id),
        dept,
    ))
}

pub async fn delete_department(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<ApiResponse<()>, AppError> {
    state.departments.delete(id).await?;
    Ok(ApiResponse::message(
        StatusCode::OK,
        format!("Department {} deleted successfully", id),
    ))
}
