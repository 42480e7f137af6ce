use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

/// Longest temporary suspension. Longer requests are clamped to it.
pub const MAX_SUSPENSION_DAYS: u32 = 3650;

/// A disciplinary record applied to a user.
///
/// Actions are created once by an admin and afterwards only mutated by
/// reversal. Whether an action is still in effect is never stored; it is
/// derived from `reversed_at` and `ends_at` (see [`ModerationAction::is_active_at`]).
///
/// # Invariants
/// - `severity` always equals `action_type.severity()`
/// - `ends_at` is only ever set for [`ActionType::Suspension`]
/// - once `reversed_at` is set the action is inert for enforcement and listing,
///   but stays retrievable by id for audit
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct ModerationAction {
    /// Unique identifier (UUID v7, so ids sort by creation time)
    pub id: Uuid,

    /// Subject of the action
    pub user_id: String,

    pub action_type: ActionType,

    /// Cached rank of `action_type`, used to pick the most serious active action
    pub severity: u8,

    pub reason: ActionReason,

    /// Admin who issued the action. Empty, and left out of the JSON, in
    /// redacted user views.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub performed_by: String,

    /// Offending content, when the action was triggered by a specific item
    pub content_id: Option<String>,

    /// Kind of the offending content (e.g. "prompt", "bundle", "comment")
    pub content_type: Option<String>,

    /// Explanation shown to the user
    pub details: Option<String>,

    /// Admin-only notes, stripped from user-facing views
    pub internal_notes: Option<String>,

    pub starts_at: DateTime<Utc>,

    /// End of a temporary suspension. `None` means the action does not expire.
    pub ends_at: Option<DateTime<Utc>>,

    pub reversed_at: Option<DateTime<Utc>>,
    pub reversed_by: Option<String>,
    pub reversal_reason: Option<String>,
}

impl ModerationAction {
    /// Builds a new action starting at `now`.
    ///
    /// `duration_days` only has an effect for suspensions: a positive value sets
    /// `ends_at` that many calendar days after `now`, capped at
    /// [`MAX_SUSPENSION_DAYS`]. It is ignored for every other action type.
    pub fn issue(input: NewModerationAction, now: DateTime<Utc>) -> Self {
        let ends_at = match (input.action_type, input.duration_days) {
            (ActionType::Suspension, Some(days)) if days > 0 => {
                let days = Days::new(u64::from(days.min(MAX_SUSPENSION_DAYS)));
                // A temporary suspension always gets an end date.
                Some(now.checked_add_days(days).unwrap_or(DateTime::<Utc>::MAX_UTC))
            }
            _ => None,
        };

        Self {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            action_type: input.action_type,
            severity: input.action_type.severity(),
            reason: input.reason,
            performed_by: input.performed_by,
            content_id: input.content_id,
            content_type: input.content_type,
            details: input.details,
            internal_notes: input.internal_notes,
            starts_at: now,
            ends_at,
            reversed_at: None,
            reversed_by: None,
            reversal_reason: None,
        }
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed_at.is_some()
    }

    /// True once a temporary suspension has run out.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.ends_at.is_some_and(|ends_at| ends_at <= now)
    }

    /// An action is in effect iff it was never reversed and has not expired.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_reversed() && !self.is_expired_at(now)
    }

    pub fn reverse(&mut self, reversed_by: String, reason: Option<String>, now: DateTime<Utc>) {
        self.reversed_at = Some(now);
        self.reversed_by = Some(reversed_by);
        self.reversal_reason = reason;
    }

    /// Copy safe to show to the affected user.
    pub fn redacted(&self) -> Self {
        Self {
            internal_notes: None,
            performed_by: String::new(),
            ..self.clone()
        }
    }
}

/// Input for [`ModerationAction::issue`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewModerationAction {
    pub user_id: String,
    pub action_type: ActionType,
    pub reason: ActionReason,
    pub performed_by: String,
    pub duration_days: Option<u32>,
    pub content_id: Option<String>,
    pub content_type: Option<String>,
    pub details: Option<String>,
    pub internal_notes: Option<String>,
}

impl NewModerationAction {
    pub fn new(
        user_id: impl Into<String>,
        action_type: ActionType,
        reason: ActionReason,
        performed_by: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            action_type,
            reason,
            performed_by: performed_by.into(),
            duration_days: None,
            content_id: None,
            content_type: None,
            details: None,
            internal_notes: None,
        }
    }

    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = Some(days);
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Kind of moderation action, ordered by severity.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ActionType {
    Warning,
    Suspension,
    IndefiniteSuspension,
    Ban,
}

impl ActionType {
    pub const ALL: [ActionType; 4] = [
        ActionType::Warning,
        ActionType::Suspension,
        ActionType::IndefiniteSuspension,
        ActionType::Ban,
    ];

    pub fn severity(self) -> u8 {
        match self {
            ActionType::Warning => 1,
            ActionType::Suspension => 2,
            ActionType::IndefiniteSuspension => 3,
            ActionType::Ban => 4,
        }
    }

    /// Whether an active action of this type denies access.
    pub fn is_blocking(self) -> bool {
        !matches!(self, ActionType::Warning)
    }

    /// Ban and indefinite suspension never end on their own.
    pub fn is_permanent(self) -> bool {
        matches!(self, ActionType::Ban | ActionType::IndefiniteSuspension)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Warning => "warning",
            ActionType::Suspension => "suspension",
            ActionType::IndefiniteSuspension => "indefinite_suspension",
            ActionType::Ban => "ban",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "action type",
                value: s.to_string(),
            })
    }
}

/// Policy category an action was taken under.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ActionReason {
    Spam,
    Harassment,
    HateSpeech,
    Copyright,
    Impersonation,
    Inappropriate,
    TermsViolation,
    RepeatedViolations,
    Other,
}

impl ActionReason {
    pub const ALL: [ActionReason; 9] = [
        ActionReason::Spam,
        ActionReason::Harassment,
        ActionReason::HateSpeech,
        ActionReason::Copyright,
        ActionReason::Impersonation,
        ActionReason::Inappropriate,
        ActionReason::TermsViolation,
        ActionReason::RepeatedViolations,
        ActionReason::Other,
    ];

    /// Label shown to users in enforcement messages.
    pub fn label(self) -> &'static str {
        match self {
            ActionReason::Spam => "Spam or misleading content",
            ActionReason::Harassment => "Harassment or abuse",
            ActionReason::HateSpeech => "Hate speech or discrimination",
            ActionReason::Copyright => "Copyright infringement",
            ActionReason::Impersonation => "Impersonation",
            ActionReason::Inappropriate => "Inappropriate content",
            ActionReason::TermsViolation => "Terms of service violation",
            ActionReason::RepeatedViolations => "Repeated violations",
            ActionReason::Other => "Other policy violation",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionReason::Spam => "spam",
            ActionReason::Harassment => "harassment",
            ActionReason::HateSpeech => "hate_speech",
            ActionReason::Copyright => "copyright",
            ActionReason::Impersonation => "impersonation",
            ActionReason::Inappropriate => "inappropriate",
            ActionReason::TermsViolation => "terms_violation",
            ActionReason::RepeatedViolations => "repeated_violations",
            ActionReason::Other => "other",
        }
    }
}

impl fmt::Display for ActionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionReason {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionReason::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "action reason",
                value: s.to_string(),
            })
    }
}
