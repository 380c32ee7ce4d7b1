use thiserror::Error;

use crate::core::client::database::DatabaseError;
use crate::validators::ValidatorError;

/// Reasons a claim is turned away at intake.
///
/// Everything except `Validator` and `Persistence` is the caller's fault and is
/// reported back as a 400.
#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid signature: {0}")]
    MalformedSignature(String),

    #[error("expired signature")]
    ExpiredSignature,

    #[error("invalid quest")]
    InvalidQuest,

    #[error("unsupported quest type: {0}")]
    UnsupportedQuestType(String),

    #[error("{0}")]
    SchemaValidation(String),

    #[error("quest validator failed: {0}")]
    Validator(#[from] ValidatorError),

    #[error("failed to record claim: {0}")]
    Persistence(#[from] DatabaseError),
}

impl IntakeError {
    /// Reason string returned to HTTP clients.
    pub fn public_reason(&self) -> String {
        match self {
            IntakeError::InvalidSignature | IntakeError::MalformedSignature(_) => "invalid signature".to_string(),
            IntakeError::ExpiredSignature => "expired signature".to_string(),
            IntakeError::InvalidQuest | IntakeError::UnsupportedQuestType(_) => "invalid quest".to_string(),
            IntakeError::SchemaValidation(detail) => detail.clone(),
            IntakeError::Validator(_) | IntakeError::Persistence(_) => "internal error".to_string(),
        }
    }

    /// Whether the claim itself was at fault, as opposed to a backend.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, IntakeError::Validator(_) | IntakeError::Persistence(_))
    }
}
