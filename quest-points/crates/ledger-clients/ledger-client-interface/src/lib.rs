use std::time::Duration;

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

/// Errors surfaced by a ledger backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerClientError {
    /// The grant was rejected, reverted or could not be submitted.
    #[error("Transaction failed: {0}")]
    TransactionFailure(String),

    /// The ledger did not answer within the allotted time.
    #[error("Ledger call timed out after {0:?}")]
    Timeout(Duration),

    /// A read-only call (balance lookup) failed.
    #[error("Ledger read failed: {0}")]
    Read(String),

    #[error("Invalid ledger configuration: {0}")]
    InvalidConfig(String),
}

impl LedgerClientError {
    /// Whether the error belongs to the `TransactionFailure` family recorded on a job.
    pub fn is_transaction_failure(&self) -> bool {
        matches!(self, Self::TransactionFailure(_) | Self::Timeout(_))
    }
}

/// Trait for every ledger the points service can settle against.
///
/// Implementations are remote calls: both methods may fail or hang, callers
/// are expected to bound them with a timeout.
#[automock]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Should credit `amount` points to `wallet` and return a reference to the
    /// settlement transaction (a transaction hash for on-chain ledgers).
    async fn grant(&self, wallet: Address, amount: U256) -> Result<String, LedgerClientError>;

    /// Should return the balance the ledger currently holds for `wallet`.
    async fn balance_of(&self, wallet: Address) -> Result<U256, LedgerClientError>;
}
