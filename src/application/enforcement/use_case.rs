use super::dto::{AccessDecision, SUSPENDED_PAGE, SuspensionInfo};
use crate::application::ledger::use_case::ActionLedger;
use crate::domain::moderation::{entity::ActionType, status::UserStatus};
use crate::domain::shared::{clock::Clock, errors::DomainError, timestamp::parse_timestamp};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::debug;

/// Turns a user's moderation status into an access decision for request
/// handling. Consulted on every gated request; holds no state of its own.
pub struct EnforcementGate {
    ledger: Arc<ActionLedger>,
    clock: Arc<dyn Clock>,
}

impl EnforcementGate {
    pub fn new(ledger: Arc<ActionLedger>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }

    pub fn enforce_access(&self, user_id: &str) -> Result<AccessDecision, DomainError> {
        let status = self.ledger.check_user_status(user_id)?;
        let allowed = status
            .action()
            .is_none_or(|action| !is_blocking_action(action.action_type));

        let message = match &status {
            UserStatus::Active => None,
            UserStatus::Warning { action } => Some(format!(
                "You have received a warning for: {}. Please review the community guidelines.",
                action.reason.label()
            )),
            UserStatus::Suspended { action, ends_at } => Some(match ends_at {
                Some(ends_at) => format!(
                    "Your account is under a temporary suspension for: {}. Time remaining: {}.",
                    action.reason.label(),
                    format_time_remaining(*ends_at - self.clock.now())
                ),
                None => format!(
                    "Your account is under an indefinite suspension for: {}.",
                    action.reason.label()
                ),
            }),
            UserStatus::Banned { action } => Some(format!(
                "Your account has been permanently banned for: {}.",
                action.reason.label()
            )),
        };

        if !allowed {
            debug!(user_id, status = status.as_str(), "Access blocked");
        }

        Ok(AccessDecision {
            allowed,
            redirect_to: (!allowed).then(|| SUSPENDED_PAGE.to_string()),
            status,
            message,
        })
    }

    /// Details for the suspension page. `None` only for users in good
    /// standing; a warned user gets an all-false record.
    pub fn get_suspension_info(&self, user_id: &str) -> Result<Option<SuspensionInfo>, DomainError> {
        let status = self.ledger.check_user_status(user_id)?;
        let info = match status {
            UserStatus::Active => None,
            UserStatus::Warning { .. } => Some(SuspensionInfo {
                is_suspended: false,
                is_banned: false,
                is_permanent: false,
                ends_at: None,
                time_remaining: None,
            }),
            UserStatus::Suspended { action, ends_at } => Some(SuspensionInfo {
                is_suspended: true,
                is_banned: false,
                is_permanent: action.action_type.is_permanent(),
                ends_at,
                time_remaining: ends_at
                    .map(|ends_at| format_time_remaining(ends_at - self.clock.now())),
            }),
            UserStatus::Banned { .. } => Some(SuspensionInfo {
                is_suspended: false,
                is_banned: true,
                is_permanent: true,
                ends_at: None,
                time_remaining: None,
            }),
        };
        Ok(info)
    }
}

/// Whether an active action of this type blocks access. [`EnforcementGate`]
/// derives `allowed` from this and nothing else.
pub fn is_blocking_action(action_type: ActionType) -> bool {
    action_type.is_blocking()
}

/// Long-form date for an ISO timestamp, e.g. "March 4, 2026".
pub fn format_end_date(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "Indefinite".to_string();
    };
    match parse_timestamp(raw) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => "Unknown".to_string(),
    }
}

/// Canonical user-facing sentence for an action type.
pub fn get_action_description(action_type: ActionType, ends_at: Option<DateTime<Utc>>) -> String {
    match action_type {
        ActionType::Warning => {
            "You have received a warning. Further violations may result in a suspension."
                .to_string()
        }
        ActionType::Suspension => match ends_at {
            Some(ends_at) => format!(
                "Your account has been temporarily suspended until {}.",
                format_end_date(Some(&ends_at.to_rfc3339()))
            ),
            None => "Your account has been temporarily suspended.".to_string(),
        },
        ActionType::IndefiniteSuspension => {
            "Your account has been suspended indefinitely.".to_string()
        }
        ActionType::Ban => "Your account has been permanently banned.".to_string(),
    }
}

/// Rough remaining time, two most significant units at most.
pub fn format_time_remaining(remaining: Duration) -> String {
    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;

    if days > 0 {
        join_units(days, "day", hours, "hour")
    } else if hours > 0 {
        join_units(hours, "hour", minutes, "minute")
    } else if minutes > 0 {
        plural(minutes, "minute")
    } else {
        "less than a minute".to_string()
    }
}

fn join_units(major: i64, major_unit: &str, minor: i64, minor_unit: &str) -> String {
    if minor > 0 {
        format!("{}, {}", plural(major, major_unit), plural(minor, minor_unit))
    } else {
        plural(major, major_unit)
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", count, unit)
    }
}
