use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::table::Table;
use super::{ProjectStore, StoreError};
use crate::models::{Document, Project, ProjectFields};

/// Name of the single collection inside the file
const TABLE_NAME: &str = "_default";

/// Store backed by a single JSON file.
///
/// The layout is `{"_default": {"<doc id>": {...}}}`, the format written by
/// TinyDB, so databases created by earlier deployments open unchanged. The
/// whole file is rewritten after every mutation.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    table: RwLock<Table>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or empty file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => parse_table(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Table::default(),
            Err(e) => return Err(e.into()),
        };

        info!(
            "Opened project store {} ({} documents)",
            path.display(),
            table.docs().len()
        );

        Ok(Self {
            path,
            table: RwLock::new(table),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the table out through a temp file so readers never see a
    /// half-written database.
    async fn persist(&self, table: &Table) -> Result<(), StoreError> {
        let contents = serde_json::to_string(&render_table(table))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!("Persisted {} documents to {}", table.docs().len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for JsonFileStore {
    async fn list_all(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.table.read().await.all())
    }

    async fn find(&self, id: &str) -> Result<Project, StoreError> {
        self.table.read().await.find(id)
    }

    async fn insert(&self, project: Project) -> Result<Project, StoreError> {
        let mut table = self.table.write().await;
        let mut next = table.clone();
        let stored = next.insert(project)?;
        self.persist(&next).await?;
        *table = next;
        Ok(stored)
    }

    async fn update(&self, id: &str, fields: ProjectFields) -> Result<Project, StoreError> {
        let mut table = self.table.write().await;
        let mut next = table.clone();
        let updated = next.update(id, &fields)?;
        self.persist(&next).await?;
        *table = next;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut table = self.table.write().await;
        let mut next = table.clone();
        if !next.delete(id) {
            return Ok(false);
        }
        self.persist(&next).await?;
        *table = next;
        Ok(true)
    }

    /// The file must still read and parse; before the first write only the
    /// directory has to exist.
    async fn health_check(&self) -> Result<(), StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => parse_table(&contents).map(|_| ()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let dir = match self.path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => parent,
                    _ => Path::new("."),
                };
                tokio::fs::metadata(dir).await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Mutations are persisted before they return, so closing only waits for
    /// any write in flight. An untouched store never creates its file.
    async fn close(&self) -> Result<(), StoreError> {
        let table = self.table.write().await;
        info!(
            "Closed project store {} ({} documents)",
            self.path.display(),
            table.docs().len()
        );
        Ok(())
    }
}

fn parse_table(contents: &str) -> Result<Table, StoreError> {
    if contents.trim().is_empty() {
        return Ok(Table::default());
    }

    let root: Value = serde_json::from_str(contents)?;
    let root = root
        .as_object()
        .ok_or_else(|| StoreError::Corrupt("top level is not an object".to_string()))?;

    let collection = match root.get(TABLE_NAME) {
        Some(Value::Object(collection)) => collection,
        Some(_) => {
            return Err(StoreError::Corrupt(format!("{} is not an object", TABLE_NAME)));
        }
        None => return Ok(Table::default()),
    };

    let mut docs = BTreeMap::new();
    for (key, value) in collection {
        let doc_id: u64 = key
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("invalid document id {:?}", key)))?;
        let doc: Document = match value {
            Value::Object(doc) => doc.clone(),
            _ => return Err(StoreError::Corrupt(format!("document {} is not an object", key))),
        };
        docs.insert(doc_id, doc);
    }

    Ok(Table::from_docs(docs))
}

fn render_table(table: &Table) -> Value {
    let collection: Map<String, Value> = table
        .docs()
        .iter()
        .map(|(doc_id, doc)| (doc_id.to_string(), Value::Object(doc.clone())))
        .collect();

    let mut root = Map::new();
    root.insert(TABLE_NAME.to_string(), Value::Object(collection));
    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(id: &str, featured: bool) -> Project {
        Project {
            id: id.to_string(),
            name: format!("Project {}", id),
            summary: "summary".into(),
            description: "description".into(),
            link: format!("https://example.com/{}", id),
            featured,
        }
    }

    #[tokio::test]
    async fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("projects.json")).await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
        store.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn mutations_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.insert(project("Alpha", true)).await.unwrap();
        store.insert(project("beta", false)).await.unwrap();
        store
            .update("alpha", ProjectFields { name: "Renamed".into(), ..Default::default() })
            .await
            .unwrap();
        assert!(store.delete("beta").await.unwrap());
        store.close().await.unwrap();

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let all = reopened.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "alpha");
        assert_eq!(all[0].name, "Renamed");
        assert_eq!(all[0].link, "");
    }

    #[tokio::test]
    async fn closing_untouched_store_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.list_all().await.unwrap();
        store.close().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn health_check_reads_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.insert(project("one", false)).await.unwrap();
        store.health_check().await.unwrap();

        std::fs::write(&path, "not json").unwrap();
        assert!(store.health_check().await.is_err());

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        assert!(matches!(store.health_check().await, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn writes_tinydb_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.insert(project("one", true)).await.unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["_default"]["1"]["id"], json!("one"));
        assert_eq!(raw["_default"]["1"]["featured"], json!(true));
        assert_eq!(raw["_default"]["1"]["link"], json!("https://example.com/one"));
    }

    #[tokio::test]
    async fn loads_existing_database_and_keeps_extra_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        std::fs::write(
            &path,
            json!({
                "_default": {
                    "3": {"id": "legacy", "name": "Legacy", "featured": true, "tags": ["old"]},
                    "5": {"id": "other", "name": "Other", "featured": false}
                }
            })
            .to_string(),
        )
        .unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(store.list_featured().await.unwrap().len(), 1);

        store
            .update("LEGACY", ProjectFields { name: "Updated".into(), ..Default::default() })
            .await
            .unwrap();
        store.insert(project("new", false)).await.unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["_default"]["3"]["tags"], json!(["old"]));
        assert_eq!(raw["_default"]["3"]["name"], json!("Updated"));
        assert_eq!(raw["_default"]["6"]["id"], json!("new"));
    }

    #[tokio::test]
    async fn conflict_does_not_touch_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.insert(project("taken", false)).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = store.insert(project("TAKEN", true)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn rejects_corrupt_files() {
        assert!(parse_table("").unwrap().docs().is_empty());
        assert!(parse_table("{}").unwrap().docs().is_empty());
        assert!(matches!(parse_table("[]"), Err(StoreError::Corrupt(_))));
        assert!(matches!(
            parse_table(r#"{"_default": {"x": {}}}"#),
            Err(StoreError::Corrupt(_))
        ));
        assert!(matches!(
            parse_table(r#"{"_default": {"1": 5}}"#),
            Err(StoreError::Corrupt(_))
        ));
        assert!(matches!(parse_table("not json"), Err(StoreError::Serialization(_))));
    }
}
