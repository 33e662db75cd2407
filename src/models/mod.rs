// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Assignment, BirthYearRange, CandidateResult, CooldownSet, ExposureSnapshot, ExposureStats,
    Gender, MatchReason, Member, MemberId, MemberPreferences, Religion, ScoringWeights,
    SmokingStatus, WorkplacePolicy,
};
pub use requests::{BulkMatchQuery, FindCandidatesQuery, SingleMatchRequest};
pub use responses::{
    BulkMatchItem, BulkMatchResponse, ErrorResponse, HealthResponse, RecommendResponse,
};
