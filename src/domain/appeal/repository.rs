use super::entity::Appeal;
use crate::domain::shared::errors::DomainError;
use uuid::Uuid;

/// Storage for appeals.
///
/// Collection reads return records most recently created or updated first.
#[cfg_attr(test, mockall::automock)]
pub trait AppealRepository: Send + Sync {
    /// Stores a new appeal.
    ///
    /// Fails with [`DomainError::Conflict`] if any appeal already references the
    /// same action. The existence check and the insert are atomic.
    fn insert(&self, appeal: Appeal) -> Result<Appeal, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<Appeal>, DomainError>;
    fn find_by_action_id(&self, action_id: Uuid) -> Result<Option<Appeal>, DomainError>;
    fn update(&self, appeal: Appeal) -> Result<Appeal, DomainError>;
    fn find_by_user(&self, user_id: &str) -> Result<Vec<Appeal>, DomainError>;
    fn find_all(&self) -> Result<Vec<Appeal>, DomainError>;
}
