use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw, schema-less record as persisted by the store
pub type Document = Map<String, Value>;

/// Typed view of a project document used by handlers and templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub summary: String,
    pub description: String,
    pub link: String,
    pub featured: bool,
}

/// Mutable fields of a project; edits overwrite all of them at once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    pub name: String,
    pub summary: String,
    pub description: String,
    pub link: String,
    pub featured: bool,
}

impl Project {
    pub fn new(id: impl Into<String>, fields: ProjectFields) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            summary: fields.summary,
            description: fields.description,
            link: fields.link,
            featured: fields.featured,
        }
    }

    /// Map a stored document onto the typed shape. Missing keys and nulls
    /// become defaults so hand-edited or older documents still render.
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: string_field(doc, "id"),
            name: string_field(doc, "name"),
            summary: string_field(doc, "summary"),
            description: string_field(doc, "description"),
            link: string_field(doc, "link"),
            featured: doc.get("featured").map(truthy).unwrap_or(false),
        }
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("id".to_string(), Value::String(self.id.clone()));
        self.fields().apply_to(&mut doc);
        doc
    }

    pub fn fields(&self) -> ProjectFields {
        ProjectFields {
            name: self.name.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            link: self.link.clone(),
            featured: self.featured,
        }
    }
}

impl ProjectFields {
    /// Overwrite the mutable keys of `doc`, leaving `id` and unknown keys alone
    pub fn apply_to(&self, doc: &mut Document) {
        doc.insert("name".to_string(), Value::String(self.name.clone()));
        doc.insert("summary".to_string(), Value::String(self.summary.clone()));
        doc.insert("description".to_string(), Value::String(self.description.clone()));
        doc.insert("link".to_string(), Value::String(self.link.clone()));
        doc.insert("featured".to_string(), Value::Bool(self.featured));
    }
}

/// Form checkboxes post `on`, the edit page script posts `true`
pub fn parse_featured(value: Option<&str>) -> bool {
    matches!(value, Some("on") | Some("true"))
}

fn string_field(doc: &Document, key: &str) -> String {
    match doc.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => parse_featured(Some(s.as_str())),
        _ => false,
    }
}
