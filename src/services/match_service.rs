use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::core::{MatchError, Matcher, Planner};
use crate::models::{Assignment, CandidateResult, CooldownSet, Member, MemberId};
use crate::services::store::{MemberStore, StoreError};

/// How a caller names the subject of a single match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectRef {
    Id(MemberId),
    Nickname(String),
    /// The id is tried first, the nickname only when the id resolves to nobody
    IdOrNickname { id: MemberId, nickname: String },
}

impl SubjectRef {
    /// Build from optional request fields; `None` when both are missing
    pub fn from_parts(id: Option<MemberId>, nickname: Option<String>) -> Option<Self> {
        match (id, nickname) {
            (Some(id), Some(nickname)) => Some(SubjectRef::IdOrNickname { id, nickname }),
            (Some(id), None) => Some(SubjectRef::Id(id)),
            (None, Some(nickname)) => Some(SubjectRef::Nickname(nickname)),
            (None, None) => None,
        }
    }

    /// Index of the referenced member in `members`
    pub fn position_in(&self, members: &[Member]) -> Option<usize> {
        let by_id = |id: MemberId| members.iter().position(|m| m.id == id);
        let by_nickname = |nickname: &str| members.iter().position(|m| m.nickname == nickname);

        match self {
            SubjectRef::Id(id) => by_id(*id),
            SubjectRef::Nickname(nickname) => by_nickname(nickname),
            SubjectRef::IdOrNickname { id, nickname } => {
                by_id(*id).or_else(|| by_nickname(nickname))
            }
        }
    }
}

impl fmt::Display for SubjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectRef::Id(id) => write!(f, "id {}", id),
            SubjectRef::Nickname(nickname) => write!(f, "nickname {:?}", nickname),
            SubjectRef::IdOrNickname { id, nickname } => {
                write!(f, "id {} or nickname {:?}", id, nickname)
            }
        }
    }
}

/// Errors surfaced by the match service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Subject not found: {0}")]
    SubjectNotFound(SubjectRef),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Matching error: {0}")]
    Match(#[from] MatchError),
}

/// Limits applied to caller-supplied parameters
#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    pub default_limit: usize,
    pub max_limit: usize,
    pub default_cooldown_days: u32,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
            default_cooldown_days: 0,
        }
    }
}

/// Ranked candidates for one subject; `total_candidates` counts every
/// compatible candidate before the limit was applied
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub subject: Member,
    pub candidates: Vec<CandidateResult>,
    pub total_candidates: usize,
}

/// Bulk assignment plus the nicknames needed to present it
#[derive(Debug, Clone)]
pub struct BulkPlan {
    pub assignments: Vec<Assignment>,
    nicknames: HashMap<MemberId, String>,
}

impl BulkPlan {
    pub fn nickname(&self, id: MemberId) -> Option<&str> {
        self.nicknames.get(&id).map(String::as_str)
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments
            .iter()
            .filter(|a| a.candidate_id.is_some())
            .count()
    }
}

/// Read-only matching over a member store
///
/// Pulls a fresh snapshot from the store for every call and hands it to the
/// engine. Nothing is written back.
pub struct MatchService<S> {
    store: Arc<S>,
    planner: Planner,
    options: MatchOptions,
}

impl<S: MemberStore> MatchService<S> {
    pub fn new(store: Arc<S>, matcher: Matcher, options: MatchOptions) -> Self {
        Self {
            store,
            planner: Planner::new(matcher),
            options,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Resolve the requested limit: default when absent, capped at the
    /// configured maximum, zero rejected.
    pub fn effective_limit(&self, requested: Option<usize>) -> Result<usize, MatchError> {
        match requested {
            None => Ok(self.options.default_limit.clamp(1, self.options.max_limit.max(1))),
            Some(0) => Err(MatchError::InvalidLimit),
            Some(limit) => Ok(limit.min(self.options.max_limit.max(1))),
        }
    }

    /// Ranked candidates for one subject
    pub async fn recommend(
        &self,
        subject: &SubjectRef,
        limit: Option<usize>,
        cooldown_days: Option<u32>,
    ) -> Result<Recommendation, ServiceError> {
        self.recommend_at(subject, limit, cooldown_days, Utc::now())
            .await
    }

    /// Same as [`recommend`](Self::recommend) with an explicit clock
    pub async fn recommend_at(
        &self,
        subject: &SubjectRef,
        limit: Option<usize>,
        cooldown_days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<Recommendation, ServiceError> {
        let limit = self.effective_limit(limit)?;
        let cooldown_days = cooldown_days.unwrap_or(self.options.default_cooldown_days);

        let mut pool = self.store.list_active_members(None).await?;
        let position = subject
            .position_in(&pool)
            .ok_or_else(|| ServiceError::SubjectNotFound(subject.clone()))?;
        let subject = pool.remove(position);

        let exposure = self.store.exposure_stats_for_all().await?;
        let cooldown = self.cooldown_for(subject.id, cooldown_days, now).await?;

        let mut candidates = self
            .planner
            .matcher()
            .rank_candidates(&subject, &pool, &exposure, &cooldown);
        let total_candidates = candidates.len();
        candidates.truncate(limit);

        tracing::info!(
            "Recommending {} of {} compatible candidates for member {} (from {} pooled, cooldown {} days)",
            candidates.len(),
            total_candidates,
            subject.id,
            pool.len(),
            cooldown_days
        );

        Ok(Recommendation {
            subject,
            candidates,
            total_candidates,
        })
    }

    /// Greedy one-to-one plan over every active member
    ///
    /// `None` or zero days plans without cooldowns.
    pub async fn plan_bulk(&self, cooldown_days: Option<u32>) -> Result<BulkPlan, ServiceError> {
        self.plan_bulk_at(cooldown_days, Utc::now()).await
    }

    pub async fn plan_bulk_at(
        &self,
        cooldown_days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<BulkPlan, ServiceError> {
        let members = self.store.list_active_members(None).await?;
        let exposure = self.store.exposure_stats_for_all().await?;

        let mut cooldowns = HashMap::new();
        if let Some(days) = cooldown_days.filter(|days| *days > 0) {
            for member in &members {
                let recent = self.cooldown_for(member.id, days, now).await?;
                if !recent.is_empty() {
                    cooldowns.insert(member.id, recent);
                }
            }
        }

        let assignments =
            self.planner
                .plan_bulk_with_cooldowns(&members, &members, &exposure, &cooldowns);

        let plan = BulkPlan {
            assignments,
            nicknames: members
                .into_iter()
                .map(|m| (m.id, m.nickname))
                .collect(),
        };

        tracing::info!(
            "Bulk plan assigned {} of {} members",
            plan.assigned_count(),
            plan.assignments.len()
        );

        Ok(plan)
    }

    async fn cooldown_for(
        &self,
        subject_id: MemberId,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<CooldownSet, StoreError> {
        if days == 0 {
            return Ok(CooldownSet::empty());
        }
        self.store
            .recently_presented_to(subject_id, cooldown_start(now, days))
            .await
    }
}

/// Start of a trailing window of `days`; windows reaching past the earliest
/// representable instant start there, so every presentation counts as recent.
fn cooldown_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
