use super::recency_table::RecencyTable;
use crate::domain::moderation::{entity::ModerationAction, repository::ActionRepository};
use crate::domain::shared::errors::DomainError;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info};
use uuid::Uuid;

/// Process-memory action store.
///
/// Stands in for a durable `actions` table keyed by id with a secondary index
/// on `user_id`. State lives as long as the value; build a fresh one per test.
#[derive(Debug, Default)]
pub struct InMemoryActionRepository {
    table: RwLock<RecencyTable<ModerationAction>>,
}

impl InMemoryActionRepository {
    pub fn new() -> Self {
        info!("Initializing InMemoryActionRepository");
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RecencyTable<ModerationAction>>, DomainError> {
        self.table.read().map_err(|e| {
            error!("Action store lock poisoned: {}", e);
            DomainError::InfrastructureError("Action store unavailable".into())
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RecencyTable<ModerationAction>>, DomainError> {
        self.table.write().map_err(|e| {
            error!("Action store lock poisoned: {}", e);
            DomainError::InfrastructureError("Action store unavailable".into())
        })
    }
}

impl ActionRepository for InMemoryActionRepository {
    fn insert(&self, action: ModerationAction) -> Result<ModerationAction, DomainError> {
        let mut table = self.write()?;
        if table.contains(&action.id) {
            return Err(DomainError::Conflict(format!(
                "Action {} already exists",
                action.id
            )));
        }
        table.upsert(action.id, &action.user_id, action.clone());
        debug!(action_id = %action.id, "Stored moderation action");
        Ok(action)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<ModerationAction>, DomainError> {
        Ok(self.read()?.get(&id))
    }

    fn update(&self, action: ModerationAction) -> Result<ModerationAction, DomainError> {
        let mut table = self.write()?;
        if !table.contains(&action.id) {
            return Err(DomainError::NotFound(format!("Action {}", action.id)));
        }
        table.upsert(action.id, &action.user_id, action.clone());
        Ok(action)
    }

    fn find_by_user(&self, user_id: &str) -> Result<Vec<ModerationAction>, DomainError> {
        Ok(self.read()?.recent_for_owner(user_id))
    }

    fn find_all(&self) -> Result<Vec<ModerationAction>, DomainError> {
        Ok(self.read()?.recent())
    }
}
