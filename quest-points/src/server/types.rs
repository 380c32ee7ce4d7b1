use serde::{Deserialize, Serialize};

/// Body of a successful `POST /points`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Body of a successful `GET /points`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PointsResponse {
    /// EIP-55 checksummed address
    pub wallet: String,
    /// Ledger balance as a decimal string
    pub points: String,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Query string of `GET /points`.
#[derive(Debug, Deserialize)]
pub struct WalletQuery {
    pub wallet: Option<String>,
}
