use std::collections::BTreeMap;

use serde_json::Value;

use super::{normalize_id, StoreError};
use crate::models::{Document, Project, ProjectFields};

/// In-memory document table shared by both store backends.
///
/// Documents are keyed by a monotonically increasing document id, which
/// keeps insertion order and matches the on-disk layout.
#[derive(Debug, Default, Clone)]
pub(crate) struct Table {
    docs: BTreeMap<u64, Document>,
    last_id: u64,
}

impl Table {
    pub fn from_docs(docs: BTreeMap<u64, Document>) -> Self {
        let last_id = docs.keys().next_back().copied().unwrap_or(0);
        Self { docs, last_id }
    }

    pub fn docs(&self) -> &BTreeMap<u64, Document> {
        &self.docs
    }

    pub fn all(&self) -> Vec<Project> {
        self.docs.values().map(Project::from_document).collect()
    }

    pub fn find(&self, id: &str) -> Result<Project, StoreError> {
        self.doc_id_of(id)
            .and_then(|doc_id| self.docs.get(&doc_id))
            .map(Project::from_document)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn insert(&mut self, mut project: Project) -> Result<Project, StoreError> {
        project.id = normalize_id(&project.id);
        if self.doc_id_of(&project.id).is_some() {
            return Err(StoreError::Conflict(project.id));
        }

        self.last_id += 1;
        self.docs.insert(self.last_id, project.to_document());
        Ok(project)
    }

    pub fn update(&mut self, id: &str, fields: &ProjectFields) -> Result<Project, StoreError> {
        let doc = self
            .doc_id_of(id)
            .and_then(|doc_id| self.docs.get_mut(&doc_id))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        fields.apply_to(doc);
        Ok(Project::from_document(doc))
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let key = normalize_id(id);
        let before = self.docs.len();
        self.docs.retain(|_, doc| !id_matches(doc, &key));
        self.docs.len() != before
    }

    fn doc_id_of(&self, id: &str) -> Option<u64> {
        let key = normalize_id(id);
        self.docs
            .iter()
            .find(|(_, doc)| id_matches(doc, &key))
            .map(|(doc_id, _)| *doc_id)
    }
}

fn id_matches(doc: &Document, key: &str) -> bool {
    doc.get("id")
        .and_then(Value::as_str)
        .map(|stored| normalize_id(stored) == key)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, featured: bool) -> Project {
        Project {
            id: id.to_string(),
            name: format!("{} name", id),
            featured,
            ..Default::default()
        }
    }

    #[test]
    fn insert_lowercases_and_allocates_ids() {
        let mut table = Table::default();
        let stored = table.insert(project("Foo", false)).unwrap();
        table.insert(project("bar", true)).unwrap();

        assert_eq!(stored.id, "foo");
        assert_eq!(table.docs().keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(table.find("FOO").unwrap().name, "Foo name");
    }

    #[test]
    fn conflict_is_case_insensitive_and_leaves_table_alone() {
        let mut table = Table::default();
        table.insert(project("dup", false)).unwrap();

        let err = table.insert(project("DUP", true)).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(id) if id == "dup"));
        assert_eq!(table.all().len(), 1);
        assert!(!table.find("dup").unwrap().featured);
    }

    #[test]
    fn ids_continue_after_deletes() {
        let mut table = Table::default();
        table.insert(project("a", false)).unwrap();
        table.insert(project("b", false)).unwrap();
        assert!(table.delete("b"));
        table.insert(project("c", false)).unwrap();

        assert_eq!(table.docs().keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn legacy_mixed_case_ids_are_reachable() {
        let mut docs = BTreeMap::new();
        docs.insert(7, project("MixedCase", false).to_document());
        let mut table = Table::from_docs(docs);

        assert_eq!(table.find("mixedcase").unwrap().id, "MixedCase");
        table.insert(project("next", false)).unwrap();
        assert!(table.docs().contains_key(&8));
    }

    #[test]
    fn update_and_delete_missing() {
        let mut table = Table::default();
        assert!(matches!(
            table.update("ghost", &ProjectFields::default()),
            Err(StoreError::NotFound(_))
        ));
        assert!(!table.delete("ghost"));
    }
}
