use super::dto::ReviewOutcome;
use crate::application::{
    appeals::{dto::UpdateAppealStatus, use_case::AppealTracker},
    ledger::use_case::ActionLedger,
};
use crate::domain::appeal::entity::AppealStatus;
use crate::domain::shared::errors::DomainError;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Applies an admin decision to an appeal and, on approval, reverses the
/// contested action in the ledger.
pub struct ReviewAppealUseCase {
    appeals: Arc<AppealTracker>,
    ledger: Arc<ActionLedger>,
}

impl ReviewAppealUseCase {
    pub fn new(appeals: Arc<AppealTracker>, ledger: Arc<ActionLedger>) -> Self {
        Self { appeals, ledger }
    }

    /// Returns `Ok(None)` when the appeal does not exist.
    ///
    /// An action that is already reversed or no longer in the ledger does not
    /// fail the review; the appeal decision still stands.
    #[instrument(skip(self, update), fields(appeal_id = %update.appeal_id))]
    pub fn execute(&self, update: UpdateAppealStatus) -> Result<Option<ReviewOutcome>, DomainError> {
        let reviewer = update
            .reviewed_by
            .clone()
            .unwrap_or_else(|| "system".to_string());

        let Some(appeal) = self.appeals.update_appeal_status(update)? else {
            return Ok(None);
        };

        if appeal.status != AppealStatus::Approved {
            return Ok(Some(ReviewOutcome {
                appeal,
                reversed_action: None,
            }));
        }

        let reversal = self.ledger.reverse_action(
            appeal.action_id,
            &reviewer,
            Some(format!("Appeal {} approved", appeal.id)),
        );
        let reversed_action = match reversal {
            Ok(Some(action)) => {
                info!(action_id = %action.id, "Action reversed after approved appeal");
                Some(action)
            }
            Ok(None) => {
                warn!(action_id = %appeal.action_id, "Approved appeal references unknown action");
                None
            }
            Err(DomainError::Conflict(_)) => {
                info!(action_id = %appeal.action_id, "Appealed action was already reversed");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Some(ReviewOutcome {
            appeal,
            reversed_action,
        }))
    }
}
