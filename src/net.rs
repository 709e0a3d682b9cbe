pub mod error;
pub mod mime;
pub mod fs;
