mod project;

pub use project::{Project, ProjectWithCategory, PROJECT_COLUMNS};
