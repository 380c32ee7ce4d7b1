pub mod daily;
pub mod social;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use strum::IntoEnumIterator;
use thiserror::Error;

pub use daily::DailyQuestValidator;
pub use social::SocialQuestValidator;

use crate::error::intake::IntakeError;
use crate::types::quest::QuestType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidatorError {
    /// The backend a validator consults could not answer.
    #[error("quest backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("{0}")]
    Other(String),
}

/// Validation and reward logic for one quest type.
///
/// Both operations may consult external state, so they are async and fallible.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestValidator: Send + Sync {
    /// The quest type this validator answers for.
    fn quest_type(&self) -> QuestType;

    /// Whether `quest_id` names a completed quest of this type.
    async fn validate(&self, quest_id: &str) -> Result<bool, ValidatorError>;

    /// Points credited for completing `quest_id`.
    async fn reward_for(&self, quest_id: &str) -> Result<u64, ValidatorError>;
}

/// Resolves a claim's `quest_type` to its validator by exact match.
///
/// Declared quest types without a registered validator resolve to
/// `UnsupportedQuestType`, the same as strings that name no quest type at all.
#[derive(Clone, Default)]
pub struct QuestValidatorRegistry {
    validators: HashMap<QuestType, Arc<dyn QuestValidator>>,
}

impl QuestValidatorRegistry {
    /// A registry with no validators. Every lookup fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// The daily and social validators. `secret` stays unregistered.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(DailyQuestValidator::default()));
        registry.register(Arc::new(SocialQuestValidator::default()));
        registry
    }

    /// Registers `validator` under its own quest type, returning the one it replaces.
    pub fn register(&mut self, validator: Arc<dyn QuestValidator>) -> Option<Arc<dyn QuestValidator>> {
        self.validators.insert(validator.quest_type(), validator)
    }

    pub fn resolve(&self, quest_type: &str) -> Result<Arc<dyn QuestValidator>, IntakeError> {
        let parsed =
            QuestType::from_str(quest_type).map_err(|_| IntakeError::UnsupportedQuestType(quest_type.to_string()))?;
        self.validators.get(&parsed).cloned().ok_or_else(|| IntakeError::UnsupportedQuestType(quest_type.to_string()))
    }

    pub fn registered(&self) -> Vec<QuestType> {
        let mut types: Vec<QuestType> = self.validators.keys().copied().collect();
        types.sort_by_key(|t| t.to_string());
        types
    }

    /// Declared quest types that have no validator, in declaration order.
    pub fn unregistered(&self) -> Vec<QuestType> {
        QuestType::iter().filter(|t| !self.validators.contains_key(t)).collect()
    }
}
