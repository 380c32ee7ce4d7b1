use quest_points_ledger_client_interface::LedgerClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EthereumLedgerError {
    #[error("Contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),

    #[error("Pending transaction error: {0}")]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),

    #[error("Transaction {0} reverted")]
    Reverted(String),
}

impl From<EthereumLedgerError> for LedgerClientError {
    fn from(err: EthereumLedgerError) -> Self {
        LedgerClientError::TransactionFailure(err.to_string())
    }
}
