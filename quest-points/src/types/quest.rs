use serde::{Deserialize, Serialize};

/// Closed set of quest kinds a claim may reference.
///
/// Declaring a kind here does not make it claimable: a kind is only accepted
/// once a validator for it is registered in the
/// [`QuestValidatorRegistry`](crate::validators::QuestValidatorRegistry).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuestType {
    Daily,
    Social,
    Secret,
}
