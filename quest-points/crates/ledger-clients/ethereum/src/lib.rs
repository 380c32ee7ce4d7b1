use std::time::Duration;

use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use async_trait::async_trait;
use quest_points_ledger_client_interface::{LedgerClient, LedgerClientError};
use tracing::{debug, info, warn};
use url::Url;

pub mod chain;
mod error;

pub use chain::Chain;
use error::EthereumLedgerError;

// Only the two entry points the service needs; ownership management stays with operator tooling.
sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface QuestPoints {
        function grantPoints(address user, uint256 amount) external;
        function points(address user) external view returns (uint256);
    }
}

#[derive(Clone, Debug)]
pub struct EthereumLedgerValidatedArgs {
    pub rpc_url: Url,

    pub private_key: String,

    pub contract_address: Address,

    pub chain: Chain,

    /// How long to wait for the grant receipt once the transaction is broadcast.
    pub receipt_timeout: Duration,
}

pub struct EthereumLedgerClient {
    contract: QuestPoints::QuestPointsInstance<DynProvider>,
    operator_address: Address,
    receipt_timeout: Duration,
}

impl EthereumLedgerClient {
    /// Builds a wallet-backed provider and checks that the RPC serves the configured chain.
    pub async fn new_with_args(args: &EthereumLedgerValidatedArgs) -> Result<Self, LedgerClientError> {
        let signer: PrivateKeySigner = args
            .private_key
            .parse()
            .map_err(|e| LedgerClientError::InvalidConfig(format!("Failed to parse private key: {}", e)))?;
        let operator_address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let provider = ProviderBuilder::new().wallet(wallet).connect_http(args.rpc_url.clone()).erased();

        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| LedgerClientError::InvalidConfig(format!("Failed to fetch chain id: {}", e)))?;
        if chain_id != args.chain.id() {
            return Err(LedgerClientError::InvalidConfig(format!(
                "RPC serves chain id {} but {} ({}) was configured",
                chain_id,
                args.chain,
                args.chain.id()
            )));
        }

        info!(
            chain = %args.chain,
            contract = %args.contract_address,
            operator = %operator_address,
            "Ethereum ledger client initialised"
        );

        Ok(Self {
            contract: QuestPoints::new(args.contract_address, provider),
            operator_address,
            receipt_timeout: args.receipt_timeout,
        })
    }

    /// Address that signs every `grantPoints` transaction.
    pub fn operator_address(&self) -> Address {
        self.operator_address
    }
}

#[async_trait]
impl LedgerClient for EthereumLedgerClient {
    /// Sends `grantPoints` and waits for its receipt. A reverted receipt is a failure.
    async fn grant(&self, wallet: Address, amount: U256) -> Result<String, LedgerClientError> {
        info!(
            log_type = "starting",
            category = "grant_points",
            wallet = %wallet,
            amount = %amount,
            "Submitting grantPoints transaction."
        );

        let pending = self.contract.grantPoints(wallet, amount).send().await.map_err(EthereumLedgerError::from)?;
        let tx_hash = format!("0x{:x}", pending.tx_hash());
        debug!(tx_hash = %tx_hash, "grantPoints broadcast, waiting for receipt");

        let receipt = pending
            .with_timeout(Some(self.receipt_timeout))
            .get_receipt()
            .await
            .map_err(EthereumLedgerError::from)?;

        if !receipt.status() {
            warn!(tx_hash = %tx_hash, wallet = %wallet, "grantPoints transaction reverted");
            return Err(EthereumLedgerError::Reverted(tx_hash).into());
        }

        info!(
            log_type = "completed",
            category = "grant_points",
            wallet = %wallet,
            tx_hash = %tx_hash,
            "grantPoints transaction included."
        );
        Ok(tx_hash)
    }

    async fn balance_of(&self, wallet: Address) -> Result<U256, LedgerClientError> {
        self.contract.points(wallet).call().await.map_err(|e| LedgerClientError::Read(e.to_string()))
    }
}
