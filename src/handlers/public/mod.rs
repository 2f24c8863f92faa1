// handlers/public/mod.rs - pages anyone can request
//
// Gallery pages and the login/logout flow. The admin flag is still read so
// pages can show edit links, but nothing here is rejected for lacking it.
pub mod auth;
pub mod projects;

pub use auth::{login, login_form, logout};
pub use projects::{home, list_all_projects, view_project};
