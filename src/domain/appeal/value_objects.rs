use serde::{Deserialize, Serialize};
use validator::Validate;

/// The user's free-text case for reconsideration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppealExplanation {
    #[validate(length(min = 1, max = 5000))]
    pub value: String,
}

impl AppealExplanation {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let explanation = Self {
            value: value.trim().to_string(),
        };
        explanation.validate()?;
        Ok(explanation)
    }
}
