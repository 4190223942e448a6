use serde::{Deserialize, Serialize};
use service_core::time::now_iso8601;

/// Department summary embedded when a team is read with its department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeptInfo {
    pub id: i64,
    pub name: String,
}

/// A team row. `dept_id` of 0 means the department is unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub dept_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default = "now_iso8601")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept: Option<DeptInfo>,
}

impl Default for Team {
    fn default() -> Self {
        Self {
            id: None,
            dept_id: 0,
            name: String::new(),
            created_at: now_iso8601(),
            dept: None,
        }
    }
}

impl Team {
    pub fn new(name: impl Into<String>, dept_id: i64) -> Self {
        Self {
            name: name.into(),
            dept_id,
            ..Default::default()
        }
    }

    /// Copy without the embedded department, as stored in the table.
    pub fn without_dept(&self) -> Self {
        Self {
            dept: None,
            ..self.clone()
        }
    }
}

impl From<NewTeam> for Team {
    fn from(new: NewTeam) -> Self {
        Team::new(new.name, new.dept_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTeam {
    pub name: String,
    pub dept_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dept_id: Option<i64>,
}

impl TeamPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.dept_id.is_none()
    }

    pub fn apply(&self, team: &mut Team) {
        if let Some(name) = &self.name {
            team.name = name.clone();
        }
        if let Some(dept_id) = self.dept_id {
            team.dept_id = dept_id;
        }
    }
}
