use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::Address;
use quest_points_ethereum_ledger_client::{Chain, EthereumLedgerValidatedArgs};

use crate::cli::ledger::LedgerCliArgs;
use crate::error::ServiceError;

/// Validates ledger flags into the arguments the Ethereum client is built from.
pub fn validate_ledger_args(
    args: &LedgerCliArgs,
    receipt_timeout: Duration,
) -> Result<EthereumLedgerValidatedArgs, ServiceError> {
    let contract_address = Address::from_str(&args.contract_address)
        .map_err(|e| ServiceError::ConfigError(format!("Invalid contract address {}: {}", args.contract_address, e)))?;
    let chain = Chain::from_str(&args.chain).map_err(|_| {
        ServiceError::ConfigError(format!(
            "Unsupported chain {}, expected one of mainnet, sepolia, base-sepolia, polygon-amoy",
            args.chain
        ))
    })?;

    Ok(EthereumLedgerValidatedArgs {
        rpc_url: args.rpc_url.clone(),
        private_key: args.private_key.clone(),
        contract_address,
        chain,
        receipt_timeout,
    })
}
