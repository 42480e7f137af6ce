use super::entity::ModerationAction;
use crate::domain::shared::errors::DomainError;
use uuid::Uuid;

/// Storage for moderation actions.
///
/// Collection reads return records most recently created or updated first.
#[cfg_attr(test, mockall::automock)]
pub trait ActionRepository: Send + Sync {
    fn insert(&self, action: ModerationAction) -> Result<ModerationAction, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<ModerationAction>, DomainError>;
    fn update(&self, action: ModerationAction) -> Result<ModerationAction, DomainError>;
    fn find_by_user(&self, user_id: &str) -> Result<Vec<ModerationAction>, DomainError>;
    fn find_all(&self) -> Result<Vec<ModerationAction>, DomainError>;
}
