pub mod intake;

use quest_points_ledger_client_interface::LedgerClientError;
use thiserror::Error;

use crate::core::client::database::DatabaseError;
pub use intake::IntakeError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error types for the quest points service
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),

    #[error("Ledger error: {0}")]
    LedgerError(#[from] LedgerClientError),

    #[error("Intake error: {0}")]
    IntakeError(#[from] IntakeError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Service Error: {0}")]
    ServiceAnyHowError(#[from] anyhow::Error),
}
