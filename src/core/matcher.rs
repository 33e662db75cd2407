use thiserror::Error;

use crate::core::{
    filters::{exclude_recent, mutually_compatible},
    ranking::rank_by_exposure,
    scoring::calculate_match_score,
};
use crate::models::{CandidateResult, CooldownSet, ExposureSnapshot, Member, ScoringWeights};

/// Errors the matching engine reports to its caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("limit must be at least 1")]
    InvalidLimit,
}

/// Candidate pool assembler - implements the single-match pipeline
///
/// # Pipeline Stages
/// 1. Drop the subject, inactive members and cooldown hits
/// 2. Mutual preference filtering
/// 3. Scoring
/// 4. Fairness ranking and truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank the candidates in `pool` for `subject`
    ///
    /// # Arguments
    /// * `subject` - The member candidates are found for
    /// * `pool` - Active members; the subject may be present and is skipped
    /// * `exposure` - Presentation history per candidate
    /// * `cooldown` - Candidates recently shown to the subject
    /// * `limit` - Maximum number of results, at least 1
    ///
    /// # Returns
    /// Candidates ranked by exposure scarcity. An empty list is a valid
    /// answer.
    pub fn recommend(
        &self,
        subject: &Member,
        pool: &[Member],
        exposure: &ExposureSnapshot,
        cooldown: &CooldownSet,
        limit: usize,
    ) -> Result<Vec<CandidateResult>, MatchError> {
        if limit == 0 {
            return Err(MatchError::InvalidLimit);
        }

        let mut results = self.rank_candidates(subject, pool, exposure, cooldown);
        results.truncate(limit);

        Ok(results)
    }

    /// Every compatible candidate in ranked order, untruncated
    pub fn rank_candidates(
        &self,
        subject: &Member,
        pool: &[Member],
        exposure: &ExposureSnapshot,
        cooldown: &CooldownSet,
    ) -> Vec<CandidateResult> {
        let eligible = pool
            .iter()
            .filter(|candidate| candidate.id != subject.id && candidate.is_active);

        let mut results: Vec<CandidateResult> = exclude_recent(eligible, cooldown)
            .into_iter()
            .filter(|candidate| mutually_compatible(subject, candidate))
            .map(|candidate| {
                let (score, reasons) = calculate_match_score(subject, candidate, &self.weights);
                CandidateResult {
                    candidate_id: candidate.id,
                    score,
                    reasons,
                    exposure: exposure.get(candidate.id),
                }
            })
            .collect();

        tracing::debug!(
            "Subject {}: {} compatible of {} pooled ({} in cooldown)",
            subject.id,
            results.len(),
            pool.len(),
            cooldown.len()
        );

        rank_by_exposure(&mut results);
        results
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
