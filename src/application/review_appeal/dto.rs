use crate::domain::appeal::entity::Appeal;
use crate::domain::moderation::entity::ModerationAction;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReviewOutcome {
    pub appeal: Appeal,
    /// The contested action, when approval reversed it
    pub reversed_action: Option<ModerationAction>,
}
