use async_trait::async_trait;

use super::{QuestValidator, ValidatorError};
use crate::types::quest::QuestType;

pub const DAILY_QUEST_REWARD: u64 = 10;

/// Daily check-in quests. Every quest id is accepted for a flat reward.
#[derive(Debug, Clone)]
pub struct DailyQuestValidator {
    reward: u64,
}

impl Default for DailyQuestValidator {
    fn default() -> Self {
        Self { reward: DAILY_QUEST_REWARD }
    }
}

#[async_trait]
impl QuestValidator for DailyQuestValidator {
    fn quest_type(&self) -> QuestType {
        QuestType::Daily
    }

    async fn validate(&self, _quest_id: &str) -> Result<bool, ValidatorError> {
        Ok(true)
    }

    async fn reward_for(&self, _quest_id: &str) -> Result<u64, ValidatorError> {
        Ok(self.reward)
    }
}
