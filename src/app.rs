use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::{PasswordChecker, SessionSigner};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::{require_admin, AdminGuard};
use crate::store::ProjectStore;
use crate::templates::Templates;

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProjectStore>,
    pub templates: Arc<Templates>,
    pub sessions: Arc<SessionSigner>,
    pub passwords: Arc<PasswordChecker>,
    pub secure_cookie: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, store: Arc<dyn ProjectStore>) -> anyhow::Result<Self> {
        let templates = Templates::new()
            .map_err(|e| anyhow::anyhow!("failed to compile page templates: {}", e))?;
        let sessions = SessionSigner::new(&config.auth.app_secret, config.auth.session_expiry_hours)
            .context("app_secret must not be empty")?;
        let passwords = PasswordChecker::new(&config.auth.pepper, &config.auth.password_hash);

        Ok(Self {
            store,
            templates: Arc::new(templates),
            sessions: Arc::new(sessions),
            passwords: Arc::new(passwords),
            secure_cookie: config.auth.secure_cookie,
        })
    }
}

pub fn app(state: AppState) -> Router {
    let guard = AdminGuard::new(state.sessions.clone());

    Router::new()
        // Public
        .route("/", get(public::home))
        .route("/health", get(health))
        .merge(project_routes())
        .merge(admin_routes())
        // Admin only
        .merge(project_admin_routes(guard))
        .fallback(not_found)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects/", get(public::list_all_projects))
        .route("/projects/:id/", get(public::view_project))
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login/", get(public::login_form))
        .route("/admin/login", post(public::login))
        .route("/admin/logout", get(public::logout))
}

/// Mutating project routes; the guard runs before any of these handlers
fn project_admin_routes(guard: AdminGuard) -> Router<AppState> {
    Router::new()
        .route(
            "/projects/new/",
            get(protected::new_project_form).post(protected::new_project),
        )
        .route(
            "/projects/:id/edit/",
            get(protected::edit_project).post(protected::edit_project_data),
        )
        .route(
            "/projects/:id/delete/",
            get(protected::delete_project).post(protected::delete_project_confirm),
        )
        .route_layer(middleware::from_fn_with_state(guard, require_admin))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "store unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "store": "unavailable"
                    }
                })),
            )
        }
    }
}

async fn not_found() -> ApiError {
    ApiError::not_found("The requested page does not exist")
}
