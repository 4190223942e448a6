pub mod department;
pub mod repository;

pub use department::DepartmentService;
pub use repository::{
    DepartmentRepository, InMemoryDepartmentRepository, SupabaseDepartmentRepository,
};
