use super::dto::{AppealFilters, AppealStats, UpdateAppealStatus};
use crate::domain::appeal::{
    entity::{Appeal, AppealEligibility, AppealStatus, NewAppeal},
    policy::AppealPolicy,
    repository::AppealRepository,
};
use crate::domain::shared::{clock::Clock, errors::DomainError, timestamp::parse_timestamp};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

const INVALID_TIMESTAMP: &str = "Invalid action timestamp";
const ALREADY_SUBMITTED: &str = "An appeal has already been submitted for this action";

/// Gates appeal creation and tracks each appeal through review.
///
/// The tracker only sees the action id and timestamp it is given; it never
/// reads the action ledger.
pub struct AppealTracker {
    repository: Box<dyn AppealRepository>,
    clock: Arc<dyn Clock>,
    policy: AppealPolicy,
}

impl AppealTracker {
    pub fn new(
        repository: Box<dyn AppealRepository>,
        clock: Arc<dyn Clock>,
        policy: AppealPolicy,
    ) -> Self {
        info!(
            submission_window_days = policy.submission_window.num_days(),
            review_window_days = policy.review_window.num_days(),
            allow_reopen = policy.allow_reopen,
            "Initializing AppealTracker"
        );
        Self {
            repository,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &AppealPolicy {
        &self.policy
    }

    /// Pre-check for the submission form.
    ///
    /// Rules apply in order: the timestamp must parse, no appeal may exist for
    /// the action, and the action must fall inside the submission window.
    pub fn can_appeal(
        &self,
        action_id: Uuid,
        action_created_at: &str,
    ) -> Result<AppealEligibility, DomainError> {
        let Some(created_at) = parse_timestamp(action_created_at) else {
            return Ok(AppealEligibility::ineligible(INVALID_TIMESTAMP));
        };

        if self.repository.find_by_action_id(action_id)?.is_some() {
            return Ok(AppealEligibility::ineligible(ALREADY_SUBMITTED));
        }

        if self.clock.now() - created_at > self.policy.submission_window {
            return Ok(AppealEligibility::ineligible(format!(
                "The appeal window for this action has expired. Appeals must be filed within {} days.",
                self.policy.submission_window.num_days()
            )));
        }

        Ok(AppealEligibility::eligible())
    }

    /// Files an appeal.
    ///
    /// This is the authoritative duplicate check: it holds even when
    /// [`Self::can_appeal`] was never called, and even under concurrent
    /// submissions for the same action.
    #[instrument(skip(self, input), fields(action_id = %input.action_id, user_id = %input.user_id))]
    pub fn create_appeal(&self, input: NewAppeal) -> Result<Appeal, DomainError> {
        if self.repository.find_by_action_id(input.action_id)?.is_some() {
            warn!("Rejected duplicate appeal");
            return Err(DomainError::Ineligible(ALREADY_SUBMITTED.into()));
        }

        let now = self.clock.now();
        let appeal = Appeal {
            id: Uuid::now_v7(),
            action_id: input.action_id,
            user_id: input.user_id,
            user_email: input.user_email,
            user_name: input.user_name,
            explanation: input.explanation,
            status: AppealStatus::Pending,
            submitted_at: now,
            deadline_at: now
                .checked_add_signed(self.policy.review_window)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            reviewed_at: None,
            reviewed_by: None,
            admin_response: None,
        };

        let appeal = self.repository.insert(appeal).map_err(|e| match e {
            DomainError::Conflict(_) => {
                warn!("Rejected duplicate appeal at insert");
                DomainError::Ineligible(ALREADY_SUBMITTED.into())
            }
            other => other,
        })?;
        info!(appeal_id = %appeal.id, deadline_at = %appeal.deadline_at, "Appeal submitted");
        Ok(appeal)
    }

    pub fn get_appeal(&self, id: Uuid) -> Result<Option<Appeal>, DomainError> {
        self.repository.find_by_id(id)
    }

    pub fn get_appeal_by_action_id(&self, action_id: Uuid) -> Result<Option<Appeal>, DomainError> {
        self.repository.find_by_action_id(action_id)
    }

    pub fn list_appeals(&self, filters: &AppealFilters) -> Result<Vec<Appeal>, DomainError> {
        let candidates = match filters.user_id.as_deref() {
            Some(user_id) => self.repository.find_by_user(user_id)?,
            None => self.repository.find_all()?,
        };
        let matching = candidates
            .into_iter()
            .filter(|a| filters.status.is_none_or(|s| a.status == s))
            .collect();
        Ok(filters.page.apply(matching))
    }

    pub fn get_user_appeals(&self, user_id: &str) -> Result<Vec<Appeal>, DomainError> {
        self.repository.find_by_user(user_id)
    }

    /// Moves an appeal to a review status.
    ///
    /// Returns `Ok(None)` for an unknown id. Approved and denied are final
    /// unless the policy allows reopening, in which case any transition is
    /// accepted.
    #[instrument(skip(self, update), fields(appeal_id = %update.appeal_id, status = ?update.status))]
    pub fn update_appeal_status(
        &self,
        update: UpdateAppealStatus,
    ) -> Result<Option<Appeal>, DomainError> {
        let Some(mut appeal) = self.repository.find_by_id(update.appeal_id)? else {
            return Ok(None);
        };

        if appeal.status.is_terminal() && !self.policy.allow_reopen {
            warn!(current = %appeal.status, "Rejected transition of resolved appeal");
            return Err(DomainError::Conflict(format!(
                "Appeal has already been {}",
                appeal.status
            )));
        }

        appeal.status = update.status.into();
        appeal.reviewed_at = Some(self.clock.now());
        if let Some(reviewed_by) = update.reviewed_by {
            appeal.reviewed_by = Some(reviewed_by);
        }
        if let Some(admin_response) = update.admin_response {
            appeal.admin_response = Some(admin_response);
        }

        let appeal = self.repository.update(appeal)?;
        info!(status = %appeal.status, "Appeal status updated");
        Ok(Some(appeal))
    }

    pub fn get_stats(&self) -> Result<AppealStats, DomainError> {
        let now = self.clock.now();
        let mut stats = AppealStats::default();

        for appeal in self.repository.find_all()? {
            stats.total += 1;
            match appeal.status {
                AppealStatus::Pending => stats.pending += 1,
                AppealStatus::UnderReview => stats.under_review += 1,
                AppealStatus::Approved => stats.approved += 1,
                AppealStatus::Denied => stats.denied += 1,
            }
            if appeal.is_overdue_at(now) {
                stats.overdue_count += 1;
            }
        }

        Ok(stats)
    }
}
