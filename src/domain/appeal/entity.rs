use crate::domain::moderation::entity::ParseEnumError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

/// A user's request to reconsider one moderation action.
///
/// # Lifecycle
/// 1. **Pending** - submitted, waiting for an admin
/// 2. **UnderReview** - optional, an admin has picked it up
/// 3. **Approved** / **Denied** - resolved
///
/// # Invariants
/// - at most one appeal ever exists per `action_id`, regardless of outcome
/// - `deadline_at` is `submitted_at` plus the review window; it drives overdue
///   reporting only and never blocks a review
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct Appeal {
    pub id: Uuid,

    /// The contested moderation action
    pub action_id: Uuid,

    pub user_id: String,
    pub user_email: Option<String>,
    pub user_name: Option<String>,

    pub explanation: String,

    pub status: AppealStatus,

    pub submitted_at: DateTime<Utc>,

    /// Target time for an admin decision
    pub deadline_at: DateTime<Utc>,

    pub reviewed_at: Option<DateTime<Utc>>,
    pub reviewed_by: Option<String>,

    /// Decision text shown to the user
    pub admin_response: Option<String>,
}

impl Appeal {
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Still awaiting a decision after its deadline.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        self.is_open() && self.deadline_at < now
    }
}

/// Input for filing an appeal.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewAppeal {
    pub action_id: Uuid,
    pub user_id: String,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AppealStatus {
    Pending,
    UnderReview,
    Approved,
    Denied,
}

impl AppealStatus {
    pub const ALL: [AppealStatus; 4] = [
        AppealStatus::Pending,
        AppealStatus::UnderReview,
        AppealStatus::Approved,
        AppealStatus::Denied,
    ];

    /// Pending or under review.
    pub fn is_open(self) -> bool {
        matches!(self, AppealStatus::Pending | AppealStatus::UnderReview)
    }

    pub fn is_terminal(self) -> bool {
        !self.is_open()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppealStatus::Pending => "pending",
            AppealStatus::UnderReview => "under_review",
            AppealStatus::Approved => "approved",
            AppealStatus::Denied => "denied",
        }
    }
}

impl fmt::Display for AppealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppealStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppealStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "appeal status",
                value: s.to_string(),
            })
    }
}

/// Status an admin may move an appeal to. Appeals never return to pending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ReviewDecision {
    UnderReview,
    Approved,
    Denied,
}

impl From<ReviewDecision> for AppealStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::UnderReview => AppealStatus::UnderReview,
            ReviewDecision::Approved => AppealStatus::Approved,
            ReviewDecision::Denied => AppealStatus::Denied,
        }
    }
}

/// Result of an appeal pre-check.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq, Eq)]
#[ts(export)]
pub struct AppealEligibility {
    pub can_appeal: bool,
    pub reason: Option<String>,
}

impl AppealEligibility {
    pub fn eligible() -> Self {
        Self {
            can_appeal: true,
            reason: None,
        }
    }

    pub fn ineligible(reason: impl Into<String>) -> Self {
        Self {
            can_appeal: false,
            reason: Some(reason.into()),
        }
    }
}
