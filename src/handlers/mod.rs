// handlers/mod.rs - two-tier handler layout
//
// Public (no session needed) → Protected (admin session, enforced by the
// require_admin route layer in app.rs)
pub mod protected;
pub mod public;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// 302 Found redirect
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// 302 Found redirect that also sets (or clears) the session cookie
pub fn found_with_cookie(location: &str, cookie: String) -> Response {
    (
        StatusCode::FOUND,
        [
            (header::LOCATION, location.to_string()),
            (header::SET_COOKIE, cookie),
        ],
    )
        .into_response()
}

/// Canonical URL of a project page
pub fn project_path(id: &str) -> String {
    format!("/projects/{}/", id)
}
