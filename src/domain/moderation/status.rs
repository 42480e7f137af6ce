use super::entity::{ActionType, ModerationAction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A user's standing, derived from the most severe active action.
///
/// Never persisted; recomputed on every check.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
#[ts(export)]
pub enum UserStatus {
    Active,
    Warning {
        action: ModerationAction,
    },
    Suspended {
        action: ModerationAction,
        /// `None` for indefinite suspensions
        ends_at: Option<DateTime<Utc>>,
    },
    Banned {
        action: ModerationAction,
    },
}

impl UserStatus {
    /// Maps the single most severe active action to a status.
    pub fn from_most_severe(action: Option<ModerationAction>) -> Self {
        let Some(action) = action else {
            return UserStatus::Active;
        };
        match action.action_type {
            ActionType::Ban => UserStatus::Banned { action },
            ActionType::Suspension | ActionType::IndefiniteSuspension => UserStatus::Suspended {
                ends_at: action.ends_at,
                action,
            },
            ActionType::Warning => UserStatus::Warning { action },
        }
    }

    pub fn action(&self) -> Option<&ModerationAction> {
        match self {
            UserStatus::Active => None,
            UserStatus::Warning { action }
            | UserStatus::Suspended { action, .. }
            | UserStatus::Banned { action } => Some(action),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Warning { .. } => "warning",
            UserStatus::Suspended { .. } => "suspended",
            UserStatus::Banned { .. } => "banned",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, UserStatus::Active)
    }

    /// Same status with admin-only action fields removed.
    pub fn redacted(&self) -> Self {
        match self {
            UserStatus::Active => UserStatus::Active,
            UserStatus::Warning { action } => UserStatus::Warning {
                action: action.redacted(),
            },
            UserStatus::Suspended { action, ends_at } => UserStatus::Suspended {
                action: action.redacted(),
                ends_at: *ends_at,
            },
            UserStatus::Banned { action } => UserStatus::Banned {
                action: action.redacted(),
            },
        }
    }
}
