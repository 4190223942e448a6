mod team;

pub use team::{DeptInfo, NewTeam, Team, TeamPatch};
