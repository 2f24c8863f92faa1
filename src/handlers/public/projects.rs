use axum::{
    extract::{Path, State},
    response::Html,
};
use serde_json::json;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AdminSession;
use crate::templates::Page;

/// GET / - featured projects only
pub async fn home(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
) -> Result<Html<String>, ApiError> {
    let projects = state.store.list_featured().await?;
    state
        .templates
        .render("index", &Page::new(admin, json!({ "projects": projects })))
}

/// GET /projects/ - every project regardless of the featured flag
pub async fn list_all_projects(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
) -> Result<Html<String>, ApiError> {
    let projects = state.store.list_all().await?;
    state
        .templates
        .render("gallery_all", &Page::new(admin, json!({ "projects": projects })))
}

/// GET /projects/:id/ - single project, 404 if unknown
pub async fn view_project(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let project = state.store.find(&id).await?;
    state
        .templates
        .render("project", &Page::new(admin, json!({ "project": project })))
}
