use std::cmp::Ordering;

use crate::models::CandidateResult;

/// Order candidates by exposure scarcity
///
/// Fewest presentations first, then longest unseen (never presented sorts
/// before any timestamp), then highest score, then lowest id.
pub fn rank_by_exposure(candidates: &mut [CandidateResult]) {
    candidates.sort_by(compare_exposure);
}

pub fn compare_exposure(a: &CandidateResult, b: &CandidateResult) -> Ordering {
    a.exposure
        .presented_count
        .cmp(&b.exposure.presented_count)
        // Option orders None before Some
        .then_with(|| a.exposure.last_presented_at.cmp(&b.exposure.last_presented_at))
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| a.candidate_id.cmp(&b.candidate_id))
}
