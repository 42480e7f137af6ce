use super::dto::{ActionFilters, ActionStats};
use crate::domain::moderation::{
    entity::{ActionType, MAX_SUSPENSION_DAYS, ModerationAction, NewModerationAction},
    repository::ActionRepository,
    status::UserStatus,
};
use crate::domain::shared::{clock::Clock, errors::DomainError};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Records and queries moderation actions.
///
/// Whether an action is in effect is always derived at call time from its
/// reversal and expiry fields, so nothing here needs a background sweep.
pub struct ActionLedger {
    repository: Box<dyn ActionRepository>,
    clock: Arc<dyn Clock>,
}

impl ActionLedger {
    pub fn new(repository: Box<dyn ActionRepository>, clock: Arc<dyn Clock>) -> Self {
        info!("Initializing ActionLedger");
        Self { repository, clock }
    }

    /// Issues a new action starting now.
    ///
    /// `duration_days` only sets an end date for suspensions; it is ignored for
    /// every other type.
    #[instrument(skip(self, input), fields(
        user_id = %input.user_id,
        action_type = %input.action_type,
        reason = %input.reason
    ))]
    pub fn create_action(&self, input: NewModerationAction) -> Result<ModerationAction, DomainError> {
        if input.duration_days.is_some() && input.action_type != ActionType::Suspension {
            debug!(
                duration_days = ?input.duration_days,
                "Ignoring duration for non-suspension action"
            );
        }
        if let Some(days) = input
            .duration_days
            .filter(|d| input.action_type == ActionType::Suspension && *d > MAX_SUSPENSION_DAYS)
        {
            debug!(
                duration_days = days,
                max_days = MAX_SUSPENSION_DAYS,
                "Clamping suspension length"
            );
        }

        let action = self
            .repository
            .insert(ModerationAction::issue(input, self.clock.now()))?;
        info!(action_id = %action.id, ends_at = ?action.ends_at, "Moderation action created");
        Ok(action)
    }

    pub fn get_action(&self, id: Uuid) -> Result<Option<ModerationAction>, DomainError> {
        self.repository.find_by_id(id)
    }

    /// Lists actions most recently touched first, then pages the result.
    pub fn list_actions(&self, filters: &ActionFilters) -> Result<Vec<ModerationAction>, DomainError> {
        let now = self.clock.now();
        let candidates = match filters.user_id.as_deref() {
            Some(user_id) => self.repository.find_by_user(user_id)?,
            None => self.repository.find_all()?,
        };

        let matching = candidates
            .into_iter()
            .filter(|a| filters.action_type.is_none_or(|t| a.action_type == t))
            .filter(|a| filters.include_reversed || !a.is_reversed())
            .filter(|a| filters.include_expired || !a.is_expired_at(now))
            .collect();

        Ok(filters.page.apply(matching))
    }

    /// Every action ever recorded for the user, including reversed and expired ones.
    pub fn get_user_history(&self, user_id: &str) -> Result<Vec<ModerationAction>, DomainError> {
        self.list_actions(&ActionFilters::history_of(user_id))
    }

    /// Actions currently in effect, most severe first.
    pub fn get_active_actions_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ModerationAction>, DomainError> {
        let now = self.clock.now();
        let mut active: Vec<ModerationAction> = self
            .repository
            .find_by_user(user_id)?
            .into_iter()
            .filter(|a| a.is_active_at(now))
            .collect();
        active.sort_by(|a, b| b.severity.cmp(&a.severity));
        Ok(active)
    }

    pub fn check_user_status(&self, user_id: &str) -> Result<UserStatus, DomainError> {
        let most_severe = self.get_active_actions_for_user(user_id)?.into_iter().next();
        Ok(UserStatus::from_most_severe(most_severe))
    }

    /// Reverses an action, keeping it for audit.
    ///
    /// Returns `Ok(None)` for an unknown id and [`DomainError::Conflict`] when
    /// the action was already reversed; the original reversal record is kept.
    #[instrument(skip(self, reason))]
    pub fn reverse_action(
        &self,
        id: Uuid,
        reversed_by: &str,
        reason: Option<String>,
    ) -> Result<Option<ModerationAction>, DomainError> {
        let Some(mut action) = self.repository.find_by_id(id)? else {
            return Ok(None);
        };

        if action.is_reversed() {
            warn!(action_id = %id, "Rejected reversal of already reversed action");
            return Err(DomainError::Conflict(
                "Action has already been reversed".into(),
            ));
        }

        action.reverse(reversed_by.to_string(), reason, self.clock.now());
        let action = self.repository.update(action)?;
        info!(action_id = %id, user_id = %action.user_id, "Moderation action reversed");
        Ok(Some(action))
    }

    pub fn get_stats(&self) -> Result<ActionStats, DomainError> {
        let now = self.clock.now();
        let mut stats = ActionStats::default();

        for action in self.repository.find_all()? {
            stats.total_actions += 1;
            if !action.is_reversed() && action.ends_at.is_none_or(|ends_at| ends_at > now) {
                stats.active_actions += 1;
            }
            *stats.by_type.entry(action.action_type).or_default() += 1;
            *stats.by_reason.entry(action.reason).or_default() += 1;
        }

        Ok(stats)
    }

    /// True if the user received an action of this exact type within `window`
    /// that is still in effect. Used as a cool-down against repeat actions.
    pub fn has_recent_action(
        &self,
        user_id: &str,
        action_type: ActionType,
        window: Duration,
    ) -> Result<bool, DomainError> {
        let now = self.clock.now();
        let cutoff = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);
        Ok(self
            .repository
            .find_by_user(user_id)?
            .iter()
            .any(|a| a.action_type == action_type && a.is_active_at(now) && a.starts_at >= cutoff))
    }
}
