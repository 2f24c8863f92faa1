use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::auth::SessionSigner;
use crate::error::ApiError;

/// Whether the current request carries a valid admin session.
/// Never rejects; pages use it to decide which links to show.
#[derive(Clone, Copy, Debug)]
pub struct AdminSession(pub bool);

#[async_trait]
impl FromRequestParts<AppState> for AdminSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(AdminSession(state.sessions.is_admin(&parts.headers)))
    }
}

/// Guard state for [`require_admin`]: the signer to verify with and the
/// status to reject with.
#[derive(Clone)]
pub struct AdminGuard {
    sessions: Arc<SessionSigner>,
    status: StatusCode,
}

impl AdminGuard {
    pub fn new(sessions: Arc<SessionSigner>) -> Self {
        Self {
            sessions,
            status: StatusCode::UNAUTHORIZED,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

/// Middleware for protected routes: rejects before the handler runs unless
/// the session cookie holds a valid admin claim
pub async fn require_admin(
    State(guard): State<AdminGuard>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !guard.sessions.is_admin(request.headers()) {
        tracing::debug!("Rejected {} {} without admin session", request.method(), request.uri().path());
        return Err(ApiError::rejected(guard.status, "Admin login required"));
    }

    Ok(next.run(request).await)
}
