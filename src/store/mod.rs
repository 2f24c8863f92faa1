//! Project record store.
//!
//! Handlers only see the [`ProjectStore`] trait; the server opens a
//! [`JsonFileStore`] at startup while tests substitute a [`MemoryStore`].

pub mod json_file;
pub mod memory;
mod table;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Project, ProjectFields};

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Errors from the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Project id already exists: {0}")]
    Conflict(String),

    #[error("Store file is corrupt: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Every stored project, in insertion order
    async fn list_all(&self) -> Result<Vec<Project>, StoreError>;

    /// Projects flagged for the home page
    async fn list_featured(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|project| project.featured)
            .collect())
    }

    /// Case-insensitive lookup by id
    async fn find(&self, id: &str) -> Result<Project, StoreError>;

    /// Store a new project under its lower-cased id. Fails with
    /// `Conflict` and leaves the store untouched if the id is taken.
    async fn insert(&self, project: Project) -> Result<Project, StoreError>;

    /// Overwrite every mutable field of an existing project
    async fn update(&self, id: &str, fields: ProjectFields) -> Result<Project, StoreError>;

    /// Remove the project if present; returns whether anything was removed
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    /// Release the backend during shutdown once pending writes are durable
    async fn close(&self) -> Result<(), StoreError>;
}

/// Canonical form of a project id used for storage and lookups
pub fn normalize_id(id: &str) -> String {
    id.to_lowercase()
}
