pub mod course;
pub mod department;

pub use course::{Category, Course, CourseId, RelationKind};
pub use department::Department;
