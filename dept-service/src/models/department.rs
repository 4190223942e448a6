use serde::{Deserialize, Serialize};
use service_core::time::now_iso8601;

/// A department row. `id` is assigned by the database on insert and is never
/// sent on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default = "now_iso8601")]
    pub created_at: String,
}

impl Default for Department {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            created_at: now_iso8601(),
        }
    }
}

impl Department {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl From<NewDepartment> for Department {
    fn from(new: NewDepartment) -> Self {
        Department::new(new.name)
    }
}

/// Validated create payload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDepartment {
    pub name: String,
}

/// Fields that may change on update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepartmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DepartmentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    pub fn apply(&self, dept: &mut Department) {
        if let Some(name) = &self.name {
            dept.name = name.clone();
        }
    }
}
