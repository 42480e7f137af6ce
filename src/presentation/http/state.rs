use crate::{
    application::{
        appeals::use_case::AppealTracker, enforcement::use_case::EnforcementGate,
        ledger::use_case::ActionLedger, review_appeal::use_case::ReviewAppealUseCase,
    },
    config::Config,
    domain::shared::clock::Clock,
    infrastructure::repositories::{
        memory_action_repository::InMemoryActionRepository,
        memory_appeal_repository::InMemoryAppealRepository,
    },
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub ledger: Arc<ActionLedger>,
    pub appeals: Arc<AppealTracker>,
    pub gate: Arc<EnforcementGate>,
    pub review: Arc<ReviewAppealUseCase>,
}

impl AppState {
    /// Wires every service to fresh in-memory stores sharing one clock.
    pub fn in_memory(config: Config, clock: Arc<dyn Clock>) -> Self {
        let ledger = Arc::new(ActionLedger::new(
            Box::new(InMemoryActionRepository::new()),
            clock.clone(),
        ));
        let appeals = Arc::new(AppealTracker::new(
            Box::new(InMemoryAppealRepository::new()),
            clock.clone(),
            config.appeal_policy(),
        ));
        let gate = Arc::new(EnforcementGate::new(ledger.clone(), clock));
        let review = Arc::new(ReviewAppealUseCase::new(appeals.clone(), ledger.clone()));

        Self {
            config,
            ledger,
            appeals,
            gate,
            review,
        }
    }
}
