use chrono::{DateTime, Utc};
use std::future::Future;
use thiserror::Error;

use crate::models::{CooldownSet, ExposureSnapshot, ExposureStats, Member, MemberId};

/// Errors that can occur when reading from a member store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid row: {0}")]
    InvalidRow(String),
}

/// Read-only view of members and presentation history
///
/// This is everything the matching engine needs from persistence. Each call
/// returns a fresh snapshot; the engine never writes back.
pub trait MemberStore: Send + Sync {
    /// Active members, optionally leaving one out
    fn list_active_members(
        &self,
        exclude_id: Option<MemberId>,
    ) -> impl Future<Output = Result<Vec<Member>, StoreError>> + Send;

    /// Presentation count and latest presentation per candidate
    fn exposure_stats_for_all(
        &self,
    ) -> impl Future<Output = Result<ExposureSnapshot, StoreError>> + Send;

    /// Candidates shown to `subject_id` at or after `since`
    fn recently_presented_to(
        &self,
        subject_id: MemberId,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<CooldownSet, StoreError>> + Send;

    fn health_check(&self) -> impl Future<Output = Result<bool, StoreError>> + Send {
        async { Ok(true) }
    }
}

/// A candidate shown to a requester
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub requester_id: MemberId,
    pub candidate_id: MemberId,
    pub presented_at: DateTime<Utc>,
}

/// Member store held entirely in memory
///
/// Aggregates are computed on every call the same way the SQL store does,
/// which makes it a drop-in for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    members: Vec<Member>,
    presentations: Vec<Presentation>,
}

impl InMemoryStore {
    pub fn new(members: Vec<Member>) -> Self {
        Self {
            members,
            presentations: Vec::new(),
        }
    }

    pub fn add_member(&mut self, member: Member) {
        self.members.push(member);
    }

    pub fn record_presentation(
        &mut self,
        requester_id: MemberId,
        candidate_id: MemberId,
        presented_at: DateTime<Utc>,
    ) {
        self.presentations.push(Presentation {
            requester_id,
            candidate_id,
            presented_at,
        });
    }

    pub fn with_presentation(
        mut self,
        requester_id: MemberId,
        candidate_id: MemberId,
        presented_at: DateTime<Utc>,
    ) -> Self {
        self.record_presentation(requester_id, candidate_id, presented_at);
        self
    }

    pub fn presentations(&self) -> &[Presentation] {
        &self.presentations
    }
}

impl MemberStore for InMemoryStore {
    async fn list_active_members(
        &self,
        exclude_id: Option<MemberId>,
    ) -> Result<Vec<Member>, StoreError> {
        let mut members: Vec<Member> = self
            .members
            .iter()
            .filter(|m| m.is_active && Some(m.id) != exclude_id)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.id);
        Ok(members)
    }

    async fn exposure_stats_for_all(&self) -> Result<ExposureSnapshot, StoreError> {
        let mut totals: std::collections::HashMap<MemberId, ExposureStats> =
            std::collections::HashMap::new();

        for p in &self.presentations {
            let stats = totals.entry(p.candidate_id).or_default();
            stats.presented_count += 1;
            stats.last_presented_at = stats.last_presented_at.max(Some(p.presented_at));
        }

        Ok(totals.into_iter().collect())
    }

    async fn recently_presented_to(
        &self,
        subject_id: MemberId,
        since: DateTime<Utc>,
    ) -> Result<CooldownSet, StoreError> {
        Ok(self
            .presentations
            .iter()
            .filter(|p| p.requester_id == subject_id && p.presented_at >= since)
            .map(|p| p.candidate_id)
            .collect())
    }
}
