use crate::domain::moderation::entity::{ActionReason, ActionType};
use crate::domain::shared::pagination::PageRequest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Upper bound applied when listing a user's full history.
pub const USER_HISTORY_LIMIT: i64 = 1000;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ActionFilters {
    pub user_id: Option<String>,
    /// `None` lists every type
    pub action_type: Option<ActionType>,
    pub include_reversed: bool,
    pub include_expired: bool,
    pub page: PageRequest,
}

impl Default for ActionFilters {
    fn default() -> Self {
        Self {
            user_id: None,
            action_type: None,
            include_reversed: false,
            include_expired: false,
            page: PageRequest::default(),
        }
    }
}

impl ActionFilters {
    pub fn history_of(user_id: &str) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            include_reversed: true,
            include_expired: true,
            page: PageRequest::new(1, USER_HISTORY_LIMIT),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct ActionStats {
    pub total_actions: usize,
    pub active_actions: usize,
    pub by_type: BTreeMap<ActionType, usize>,
    pub by_reason: BTreeMap<ActionReason, usize>,
}
