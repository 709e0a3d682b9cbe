pub mod auth;
pub mod users;
pub mod files;
pub mod tasks;
pub mod projects;
pub mod chat;
pub mod vault;
pub mod stats;
