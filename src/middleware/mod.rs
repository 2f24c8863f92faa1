pub mod auth;

pub use auth::{require_admin, AdminGuard, AdminSession};
