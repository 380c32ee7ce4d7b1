use clap::Args;
use url::Url;

/// Builds a signed claim the way a wallet front-end would.
#[derive(Debug, Clone, Args)]
pub struct SignClaimCmd {
    /// Key of the wallet making the claim.
    #[arg(env = "QUEST_POINTS_CLAIM_KEY", long, hide_env_values = true)]
    pub private_key: String,

    #[arg(long)]
    pub quest_id: String,

    #[arg(long, default_value = "daily")]
    pub quest_type: String,

    /// Claim timestamp in unix millis. Defaults to now.
    #[arg(long)]
    pub timestamp: Option<i64>,

    /// Base URL of a running service. When set the claim is POSTed to `<url>/points`.
    #[arg(long, value_name = "URL")]
    pub submit: Option<Url>,
}
