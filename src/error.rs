// HTTP error types for page handlers
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};

use crate::store::StoreError;

/// Handler error with an HTTP status and a client-safe message
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized
    Unauthorized(String),

    // Guard rejection with a caller-chosen status
    Rejected { status: StatusCode, message: String },

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Rejected { status, .. } => *status,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Rejected { message, .. } => message,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Minimal HTML error page in the style of a framework default page
    pub fn to_html(&self) -> String {
        let status = self.status_code();
        let reason = status.canonical_reason().unwrap_or("Error");
        format!(
            "<!doctype html>\n<html lang=\"en\">\n<title>{code} {reason}</title>\n<h1>{reason}</h1>\n<p>{message}</p>\n</html>\n",
            code = status.as_u16(),
            reason = reason,
            message = handlebars::html_escape(self.message()),
        )
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    /// Rejection with an arbitrary status; 401 collapses to `Unauthorized`
    pub fn rejected(status: StatusCode, message: impl Into<String>) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            return ApiError::Unauthorized(message.into());
        }
        ApiError::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => ApiError::not_found(format!("No project with id '{}'", id)),
            StoreError::Conflict(id) => {
                ApiError::bad_request(format!("A project with id '{}' already exists", id))
            }
            StoreError::Corrupt(msg) => {
                tracing::error!("Project store is corrupt: {}", msg);
                ApiError::internal_server_error("The project store could not be read")
            }
            StoreError::Io(e) => {
                // Log the real error but return generic message
                tracing::error!("Project store I/O error: {}", e);
                ApiError::internal_server_error("The project store could not be accessed")
            }
            StoreError::Serialization(e) => {
                tracing::error!("Project store serialization error: {}", e);
                ApiError::internal_server_error("The project store could not be accessed")
            }
        }
    }
}

impl From<handlebars::RenderError> for ApiError {
    fn from(err: handlebars::RenderError) -> Self {
        tracing::error!("Template render error: {}", err);
        ApiError::internal_server_error("Failed to render page")
    }
}

impl From<crate::auth::SessionError> for ApiError {
    fn from(err: crate::auth::SessionError) -> Self {
        tracing::error!("Session error: {}", err);
        ApiError::internal_server_error("Failed to establish session")
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status_code().as_u16(), self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Html(self.to_html())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let not_found: ApiError = StoreError::NotFound("x".into()).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let conflict: ApiError = StoreError::Conflict("x".into()).into();
        assert_eq!(conflict.status_code(), StatusCode::BAD_REQUEST);

        let corrupt: ApiError = StoreError::Corrupt("bad".into()).into();
        assert_eq!(corrupt.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!corrupt.message().contains("bad"));
    }

    #[test]
    fn rejected_keeps_custom_status() {
        assert!(matches!(
            ApiError::rejected(StatusCode::UNAUTHORIZED, "no"),
            ApiError::Unauthorized(_)
        ));
        assert_eq!(
            ApiError::rejected(StatusCode::FORBIDDEN, "no").status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn html_page_escapes_message() {
        let page = ApiError::not_found("<script>").to_html();
        assert!(page.contains("<title>404 Not Found</title>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }
}
