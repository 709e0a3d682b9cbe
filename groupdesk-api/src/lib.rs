mod response;

pub mod error;
pub use error::{ApiError, ApiErrorKind};

mod payload;
pub use payload::Payload;

pub mod auth;
pub mod users;
pub mod fs;
pub mod tasks;
pub mod projects;
pub mod chat;
pub mod vault;
pub mod stats;
