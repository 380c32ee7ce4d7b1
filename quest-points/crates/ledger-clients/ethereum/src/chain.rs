/// EVM networks the QuestPoints contract is deployed on.
///
/// The string form is what operators pass through `QUEST_POINTS_CHAIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumString, strum_macros::Display)]
pub enum Chain {
    #[strum(serialize = "mainnet")]
    Mainnet,
    #[strum(serialize = "sepolia")]
    Sepolia,
    #[strum(serialize = "base-sepolia")]
    BaseSepolia,
    #[strum(serialize = "polygon-amoy")]
    PolygonAmoy,
}

impl Chain {
    /// EIP-155 chain id
    pub const fn id(&self) -> u64 {
        match self {
            Chain::Mainnet => 1,
            Chain::Sepolia => 11_155_111,
            Chain::BaseSepolia => 84_532,
            Chain::PolygonAmoy => 80_002,
        }
    }
}
