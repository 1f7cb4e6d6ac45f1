pub mod cookie;
pub mod manager;
#[cfg(test)]
pub mod memory;
pub mod store;

pub use manager::{SessionManager, SessionToken};
