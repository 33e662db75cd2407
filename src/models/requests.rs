use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Query string for the per-member candidates endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FindCandidatesQuery {
    #[validate(range(min = 1))]
    pub limit: Option<u16>,
    #[serde(alias = "cooldownDays")]
    pub cooldown_days: Option<u32>,
}

/// Request to find candidates for one member, by id or nickname
///
/// When both are given the id is tried first and the nickname is the fallback.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_subject_reference"))]
pub struct SingleMatchRequest {
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<i64>,
    #[validate(length(min = 1))]
    #[serde(default)]
    pub nickname: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
    #[serde(alias = "cooldown_days", rename = "cooldownDays", default)]
    pub cooldown_days: Option<u32>,
}

fn validate_subject_reference(req: &SingleMatchRequest) -> Result<(), ValidationError> {
    if req.user_id.is_none() && req.nickname.is_none() {
        return Err(ValidationError::new("user_id_or_nickname_required"));
    }
    Ok(())
}

/// Query string for the bulk plan endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkMatchQuery {
    #[serde(alias = "cooldownDays")]
    pub cooldown_days: Option<u32>,
}
