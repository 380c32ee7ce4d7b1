pub mod cli;
pub mod core;
pub mod error;
pub mod intake;
pub mod server;
pub mod types;
pub mod utils;
pub mod validators;
pub mod worker;

#[cfg(test)]
pub mod tests;

// Re-export commonly used item
pub use error::{ServiceError, ServiceResult};
