use crate::domain::appeal::entity::{AppealStatus, ReviewDecision};
use crate::domain::shared::pagination::PageRequest;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppealFilters {
    /// `None` lists every status
    pub status: Option<AppealStatus>,
    pub user_id: Option<String>,
    pub page: PageRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateAppealStatus {
    pub appeal_id: Uuid,
    pub status: ReviewDecision,
    pub reviewed_by: Option<String>,
    pub admin_response: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, PartialEq, Eq)]
#[ts(export)]
pub struct AppealStats {
    pub total: usize,
    pub pending: usize,
    pub under_review: usize,
    pub approved: usize,
    pub denied: usize,
    /// Open appeals past their review deadline
    pub overdue_count: usize,
}
