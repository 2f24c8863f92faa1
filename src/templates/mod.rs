//! Server-side page rendering.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Handlebars HTML-escapes every `{{value}}`, which is the only sanitising
//! applied to project fields.

use axum::response::Html;
use handlebars::{Handlebars, TemplateError};
use serde::Serialize;

use crate::error::ApiError;
use crate::models::Project;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("../../templates/layout.hbs")),
    ("project_card", include_str!("../../templates/project_card.hbs")),
    ("project_fields", include_str!("../../templates/project_fields.hbs")),
    ("index", include_str!("../../templates/index.hbs")),
    ("gallery_all", include_str!("../../templates/gallery_all.hbs")),
    ("project", include_str!("../../templates/project.hbs")),
    ("new", include_str!("../../templates/new.hbs")),
    ("edit_project", include_str!("../../templates/edit_project.hbs")),
    ("delete", include_str!("../../templates/delete.hbs")),
    ("login", include_str!("../../templates/login.hbs")),
];

pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, source)?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, page: &Page<T>) -> Result<Html<String>, ApiError> {
        Ok(Html(self.registry.render(name, page)?))
    }
}

/// Values every page can see, plus the page-specific data flattened in
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub admin: bool,
    pub no_login: bool,
    pub empty_project: Project,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> Page<T> {
    pub fn new(admin: bool, data: T) -> Self {
        Self {
            admin,
            no_login: false,
            empty_project: Project::default(),
            data,
        }
    }

    /// Hide the "Log in" link, used on the login page itself
    pub fn without_login_link(mut self) -> Self {
        self.no_login = true;
        self
    }
}
