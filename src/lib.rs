//! Intro Algo - candidate matching for a members-only introduction service
//!
//! Given a snapshot of active members and their presentation history, this
//! library answers two questions: which candidates should a member see next
//! (mutually compatible, not shown recently, least-exposed first), and how to
//! hand every member one distinct candidate in a single pass.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{normalize, same_workplace, MatchError, Matcher, Planner};
pub use models::{
    Assignment, CandidateResult, CooldownSet, ExposureSnapshot, ExposureStats, Member, MemberId,
    ScoringWeights,
};
pub use services::{InMemoryStore, MatchService, MemberStore, PostgresStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        assert_eq!(normalize(Some("(주) Acme")), "acme");
        assert!(same_workplace("Acme Corp", "acme"));
    }
}
