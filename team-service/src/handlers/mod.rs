pub mod teams;

pub use teams::{
    create_team, delete_team, get_team, list_teams, list_teams_by_department, update_team,
};
