use std::collections::BTreeSet;

use crate::models::{MatchReason, Member, ScoringWeights};

/// Calculate the compatibility score for a mutually compatible pair
///
/// Scoring formula:
/// score = residence_proximity    # one residence string contains the other
///
/// The score starts at zero and only rises; it is rounded to three decimals
/// so equal signals compare equal.
pub fn calculate_match_score(
    subject: &Member,
    candidate: &Member,
    weights: &ScoringWeights,
) -> (f64, BTreeSet<MatchReason>) {
    let mut score = 0.0;
    let mut reasons = BTreeSet::new();

    if residences_overlap(subject, candidate) {
        score += weights.residence_proximity;
        reasons.insert(MatchReason::NearbyResidence);
    }

    (round_score(score.max(0.0)), reasons)
}

/// Locality proximity: one residence string contains the other
#[inline]
fn residences_overlap(a: &Member, b: &Member) -> bool {
    match (a.residence(), b.residence()) {
        (Some(ra), Some(rb)) => ra.contains(rb) || rb.contains(ra),
        _ => false,
    }
}

#[inline]
fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}
