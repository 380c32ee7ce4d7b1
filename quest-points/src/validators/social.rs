use async_trait::async_trait;

use super::{QuestValidator, ValidatorError};
use crate::types::quest::QuestType;

pub const SOCIAL_QUEST_REWARD: u64 = 10;

/// Social quests (follows, shares). Completion is not checked against any network yet.
#[derive(Debug, Clone)]
pub struct SocialQuestValidator {
    reward: u64,
}

impl Default for SocialQuestValidator {
    fn default() -> Self {
        Self { reward: SOCIAL_QUEST_REWARD }
    }
}

#[async_trait]
impl QuestValidator for SocialQuestValidator {
    fn quest_type(&self) -> QuestType {
        QuestType::Social
    }

    async fn validate(&self, _quest_id: &str) -> Result<bool, ValidatorError> {
        Ok(true)
    }

    async fn reward_for(&self, _quest_id: &str) -> Result<u64, ValidatorError> {
        Ok(self.reward)
    }
}
