use async_trait::async_trait;
use tokio::sync::RwLock;

use super::table::Table;
use super::{ProjectStore, StoreError};
use crate::models::{Project, ProjectFields};

/// Non-persistent store with the same semantics as the file store
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with the given projects already inserted
    pub fn with_projects(projects: impl IntoIterator<Item = Project>) -> Result<Self, StoreError> {
        let mut table = Table::default();
        for project in projects {
            table.insert(project)?;
        }
        Ok(Self {
            table: RwLock::new(table),
        })
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.table.read().await.all())
    }

    async fn find(&self, id: &str) -> Result<Project, StoreError> {
        self.table.read().await.find(id)
    }

    async fn insert(&self, project: Project) -> Result<Project, StoreError> {
        self.table.write().await.insert(project)
    }

    async fn update(&self, id: &str, fields: ProjectFields) -> Result<Project, StoreError> {
        self.table.write().await.update(id, &fields)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.table.write().await.delete(id))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
