use axum::{
    extract::{Path, State},
    response::{Html, Json, Response},
    Form,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::handlers::{found, project_path};
use crate::models::{parse_featured, Project, ProjectFields};
use crate::templates::Page;

/// Path segment that belongs to the creation form, never a project
const RESERVED_ID: &str = "new";

#[derive(Debug, Deserialize)]
pub struct NewProjectForm {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    pub featured: Option<String>,
}

impl NewProjectForm {
    fn into_parts(self) -> (String, ProjectFields) {
        let fields = ProjectFields::from(ProjectFieldsForm {
            name: self.name,
            summary: self.summary,
            description: self.description,
            link: self.link,
            featured: self.featured,
        });
        (self.id, fields)
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectFieldsForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    pub featured: Option<String>,
}

impl From<ProjectFieldsForm> for ProjectFields {
    fn from(form: ProjectFieldsForm) -> Self {
        Self {
            name: form.name,
            summary: form.summary,
            description: form.description,
            link: form.link,
            featured: parse_featured(form.featured.as_deref()),
        }
    }
}

/// Ids double as URL path segments
pub fn validate_project_id(id: &str) -> Result<(), ApiError> {
    if id.is_empty() {
        return Err(ApiError::bad_request("Project id is required"));
    }
    if id.eq_ignore_ascii_case(RESERVED_ID) {
        return Err(ApiError::bad_request(format!("'{}' cannot be used as a project id", id)));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ApiError::bad_request(
            "Project ids may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

/// GET /projects/new/ - empty creation form
pub async fn new_project_form(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    state.templates.render("new", &Page::new(true, json!({})))
}

/// POST /projects/new/ - create, then redirect to the new project's page
pub async fn new_project(
    State(state): State<AppState>,
    Form(form): Form<NewProjectForm>,
) -> Result<Response, ApiError> {
    let (id, fields) = form.into_parts();
    let id = id.trim();
    validate_project_id(id)?;

    let stored = state.store.insert(Project::new(id, fields)).await?;
    info!("Created project {}", stored.id);

    Ok(found(&project_path(&stored.id)))
}

/// GET /projects/:id/edit/ - pre-filled edit form
pub async fn edit_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let project = state.store.find(&id).await?;
    state
        .templates
        .render("edit_project", &Page::new(true, json!({ "project": project })))
}

/// POST /projects/:id/edit/ - overwrite every field, answer with `{}`
pub async fn edit_project_data(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<ProjectFieldsForm>,
) -> Result<Json<Value>, ApiError> {
    let updated = state.store.update(&id, ProjectFields::from(form)).await?;
    info!("Updated project {}", updated.id);
    Ok(Json(json!({})))
}

/// GET /projects/:id/delete/ - confirmation page
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let project = state.store.find(&id).await?;
    state
        .templates
        .render("delete", &Page::new(true, json!({ "project": project })))
}

/// POST /projects/:id/delete/ - remove and go home. Deleting an unknown id
/// is not an error.
pub async fn delete_project_confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    if state.store.delete(&id).await? {
        info!("Deleted project {}", id.to_lowercase());
    } else {
        info!("Delete requested for unknown project {}", id);
    }
    Ok(found("/"))
}
