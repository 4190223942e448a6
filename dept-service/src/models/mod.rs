pub mod department;

pub use department::{Department, DepartmentPatch, NewDepartment};
