use axum::{
    extract::{Query, State},
    response::{Html, Response},
    Form,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::app::AppState;
use crate::auth::{clear_session_cookie, session_cookie};
use crate::error::ApiError;
use crate::handlers::{found, found_with_cookie};
use crate::middleware::AdminSession;
use crate::templates::Page;

#[derive(Debug, Deserialize)]
pub struct ReturnQuery {
    pub return_url: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub pass: String,
}

/// GET /admin/login/ - password form
pub async fn login_form(
    State(state): State<AppState>,
    AdminSession(admin): AdminSession,
    Query(query): Query<ReturnQuery>,
) -> Result<Html<String>, ApiError> {
    let return_url = safe_return_url(query.return_url.as_deref());
    let data = json!({
        "return_url": return_url,
        "return_url_encoded": encode_query_value(return_url),
    });
    state
        .templates
        .render("login", &Page::new(admin, data).without_login_link())
}

/// POST /admin/login - check the password and start a session
///
/// Success sets the session cookie and redirects to `return_url`; a wrong
/// password goes back to the login form, keeping `return_url`.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<ReturnQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let return_url = safe_return_url(query.return_url.as_deref());

    if !state.passwords.check(&form.pass) {
        warn!("Admin login failed");
        return Ok(found(&format!(
            "/admin/login/?return_url={}",
            encode_query_value(return_url)
        )));
    }

    let token = state.sessions.issue()?;
    info!("Admin login succeeded");

    Ok(found_with_cookie(
        return_url,
        session_cookie(&token, state.sessions.expiry_hours(), state.secure_cookie),
    ))
}

/// GET /admin/logout - drop the session and go home
pub async fn logout(State(state): State<AppState>) -> Response {
    info!("Admin logged out");
    found_with_cookie("/", clear_session_cookie(state.secure_cookie))
}

/// Only same-site absolute paths are followed after login
pub fn safe_return_url(candidate: Option<&str>) -> &str {
    match candidate {
        Some(url)
            if url.starts_with('/')
                && url.is_ascii()
                && !url.starts_with("//")
                && !url.contains('\\')
                && !url.chars().any(char::is_control) =>
        {
            url
        }
        _ => "/",
    }
}

fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
