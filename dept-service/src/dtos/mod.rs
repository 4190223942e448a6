//! Request payload parsing for department endpoints.

use crate::models::{DepartmentPatch, NewDepartment};
use service_core::error::AppError;
use service_core::extract::Fields;

pub fn parse_create(fields: &Fields) -> Result<NewDepartment, AppError> {
    let name = fields
        .text("name")
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing required field: name"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Department name cannot be empty"));
    }

    Ok(NewDepartment {
        name: name.to_string(),
    })
}

pub fn parse_update(fields: &Fields) -> Result<DepartmentPatch, AppError> {
    let mut patch = DepartmentPatch::default();

    if let Some(name) = fields.text("name").filter(|n| !n.is_empty()) {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Department name cannot be empty"));
        }
        patch.name = Some(name.to_string());
    }

    Ok(patch)
}
