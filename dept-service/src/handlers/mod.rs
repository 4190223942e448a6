pub mod departments;

pub use departments::{
    create_department, delete_department, get_department, get_department_teams,
    list_departments, update_department,
};
