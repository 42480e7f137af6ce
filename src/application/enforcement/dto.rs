use crate::domain::moderation::status::UserStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Where blocked users are sent.
pub const SUSPENDED_PAGE: &str = "/suspended";

/// Outcome of a gated request.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct AccessDecision {
    pub allowed: bool,
    pub status: UserStatus,
    pub message: Option<String>,
    pub redirect_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq, Eq)]
#[ts(export)]
pub struct SuspensionInfo {
    pub is_suspended: bool,
    pub is_banned: bool,
    /// Ban or indefinite suspension
    pub is_permanent: bool,
    pub ends_at: Option<DateTime<Utc>>,
    /// Human-readable time left on a temporary suspension
    pub time_remaining: Option<String>,
}
