//! Request parsing for team endpoints.

use crate::models::{NewTeam, TeamPatch};
use serde::Deserialize;
use service_core::error::AppError;
use service_core::extract::Fields;

const REQUIRED: [&str; 2] = ["name", "dept_id"];

pub fn parse_create(fields: &Fields) -> Result<NewTeam, AppError> {
    let missing = fields.missing(&REQUIRED);
    if !missing.is_empty() {
        return Err(AppError::bad_request(format!(
            "Missing required fields: {:?}",
            missing
        )));
    }

    let name = fields.text("name").unwrap_or_default();
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Team name cannot be empty"));
    }

    let dept_id = fields
        .int("dept_id")?
        .ok_or_else(|| AppError::bad_request("dept_id must be a valid integer"))?;

    Ok(NewTeam {
        name: name.to_string(),
        dept_id,
    })
}

pub fn parse_update(fields: &Fields) -> Result<TeamPatch, AppError> {
    let mut patch = TeamPatch::default();

    if let Some(name) = fields.text("name").filter(|n| !n.is_empty()) {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Team name cannot be empty"));
        }
        patch.name = Some(name.to_string());
    }

    patch.dept_id = fields.int("dept_id")?;

    Ok(patch)
}

/// `?include_dept_info=true` (case-insensitive) embeds the department.
#[derive(Debug, Default, Deserialize)]
pub struct TeamQuery {
    include_dept_info: Option<String>,
}

impl TeamQuery {
    pub fn include_dept_info(&self) -> bool {
        self.include_dept_info
            .as_deref()
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}
