use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref SUBJECT_ID_REGEX: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9_.:@-]{1,128}$").unwrap();
}

/// Identifier of a moderated user as handed to us by the auth layer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubjectId {
    #[validate(regex(path = *SUBJECT_ID_REGEX))]
    pub value: String,
}

impl SubjectId {
    pub fn new(value: String) -> Result<Self, validator::ValidationErrors> {
        let id = Self { value };
        id.validate()?;
        Ok(id)
    }
}
