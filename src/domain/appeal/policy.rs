use chrono::Duration;

pub const DEFAULT_SUBMISSION_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_REVIEW_WINDOW_DAYS: i64 = 14;

/// Time limits governing the appeal workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppealPolicy {
    /// How long after an action an appeal may still be filed
    pub submission_window: Duration,

    /// Target time between submission and decision
    pub review_window: Duration,

    /// Allow moving approved/denied appeals to another status
    pub allow_reopen: bool,
}

impl Default for AppealPolicy {
    fn default() -> Self {
        Self {
            submission_window: Duration::days(DEFAULT_SUBMISSION_WINDOW_DAYS),
            review_window: Duration::days(DEFAULT_REVIEW_WINDOW_DAYS),
            allow_reopen: false,
        }
    }
}
