pub mod project;

pub use project::{parse_featured, Document, Project, ProjectFields};
