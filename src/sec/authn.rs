pub mod password;
pub mod session;
pub mod initiator;

pub use initiator::Initiator;
