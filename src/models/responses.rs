use serde::{Deserialize, Serialize};

use crate::models::domain::{CandidateResult, MemberId};

/// Response for the single-match endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    #[serde(rename = "subjectId")]
    pub subject_id: MemberId,
    pub nickname: String,
    pub candidates: Vec<CandidateResult>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// One subject's line in a bulk plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkMatchItem {
    #[serde(rename = "forUserId")]
    pub for_user_id: MemberId,
    #[serde(rename = "forUserNickname")]
    pub for_user_nickname: String,
    #[serde(rename = "recommendedId")]
    pub recommended_id: Option<MemberId>,
    #[serde(rename = "recommendedNickname")]
    pub recommended_nickname: Option<String>,
}

/// Response for the bulk plan endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkMatchResponse {
    pub items: Vec<BulkMatchItem>,
    #[serde(rename = "assignedCount")]
    pub assigned_count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
