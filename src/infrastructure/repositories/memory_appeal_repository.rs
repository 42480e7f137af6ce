use super::recency_table::RecencyTable;
use crate::domain::appeal::{entity::Appeal, repository::AppealRepository};
use crate::domain::shared::errors::DomainError;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Debug, Default)]
struct AppealTables {
    appeals: RecencyTable<Appeal>,
    /// Unique index: action id -> appeal id
    by_action: HashMap<Uuid, Uuid>,
}

/// Process-memory appeal store with a unique index on `action_id`.
#[derive(Debug, Default)]
pub struct InMemoryAppealRepository {
    tables: RwLock<AppealTables>,
}

impl InMemoryAppealRepository {
    pub fn new() -> Self {
        info!("Initializing InMemoryAppealRepository");
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, AppealTables>, DomainError> {
        self.tables.read().map_err(|e| {
            error!("Appeal store lock poisoned: {}", e);
            DomainError::InfrastructureError("Appeal store unavailable".into())
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, AppealTables>, DomainError> {
        self.tables.write().map_err(|e| {
            error!("Appeal store lock poisoned: {}", e);
            DomainError::InfrastructureError("Appeal store unavailable".into())
        })
    }
}

impl AppealRepository for InMemoryAppealRepository {
    fn insert(&self, appeal: Appeal) -> Result<Appeal, DomainError> {
        let mut tables = self.write()?;
        if let Some(existing) = tables.by_action.get(&appeal.action_id) {
            return Err(DomainError::Conflict(format!(
                "Appeal {} already references action {}",
                existing, appeal.action_id
            )));
        }
        tables.by_action.insert(appeal.action_id, appeal.id);
        tables
            .appeals
            .upsert(appeal.id, &appeal.user_id, appeal.clone());
        debug!(appeal_id = %appeal.id, action_id = %appeal.action_id, "Stored appeal");
        Ok(appeal)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Appeal>, DomainError> {
        Ok(self.read()?.appeals.get(&id))
    }

    fn find_by_action_id(&self, action_id: Uuid) -> Result<Option<Appeal>, DomainError> {
        let tables = self.read()?;
        Ok(tables
            .by_action
            .get(&action_id)
            .and_then(|id| tables.appeals.get(id)))
    }

    fn update(&self, appeal: Appeal) -> Result<Appeal, DomainError> {
        let mut tables = self.write()?;
        if !tables.appeals.contains(&appeal.id) {
            return Err(DomainError::NotFound(format!("Appeal {}", appeal.id)));
        }
        tables
            .appeals
            .upsert(appeal.id, &appeal.user_id, appeal.clone());
        Ok(appeal)
    }

    fn find_by_user(&self, user_id: &str) -> Result<Vec<Appeal>, DomainError> {
        Ok(self.read()?.appeals.recent_for_owner(user_id))
    }

    fn find_all(&self) -> Result<Vec<Appeal>, DomainError> {
        Ok(self.read()?.appeals.recent())
    }
}
