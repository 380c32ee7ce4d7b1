use clap::Args;
use url::Url;

/// Parameters used to config the ledger the worker settles against.
#[derive(Debug, Clone, Args)]
#[group()]
pub struct LedgerCliArgs {
    /// JSON-RPC endpoint of the chain hosting the QuestPoints contract.
    #[arg(env = "QUEST_POINTS_RPC_URL", long)]
    pub rpc_url: Url,

    /// Operator key allowed to call `grantPoints`.
    #[arg(env = "QUEST_POINTS_PRIVATE_KEY", long, hide_env_values = true)]
    pub private_key: String,

    /// Address of the QuestPoints contract.
    #[arg(env = "QUEST_POINTS_CONTRACT_ADDRESS", long)]
    pub contract_address: String,

    /// One of mainnet, sepolia, base-sepolia, polygon-amoy.
    #[arg(env = "QUEST_POINTS_CHAIN", long, default_value = "sepolia")]
    pub chain: String,
}
