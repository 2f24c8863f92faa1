// handlers/protected/mod.rs - admin-only project management
//
// Every route here is mounted behind the require_admin layer, so handlers
// can assume an admin session.
pub mod projects;

pub use projects::{
    delete_project, delete_project_confirm, edit_project, edit_project_data, new_project,
    new_project_form,
};
