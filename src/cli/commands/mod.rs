pub mod password;
pub mod project;
