pub mod claim;
pub mod constant;
pub mod jobs;
pub mod params;
pub mod quest;

pub use claim::{ClaimMessage, SignedClaim};
pub use quest::QuestType;
