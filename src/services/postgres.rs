use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool, Row};
use std::time::Duration;

use crate::core::labels::{resolve_opt, LabelSet};
use crate::models::{
    BirthYearRange, CooldownSet, ExposureSnapshot, ExposureStats, Member, MemberId,
    MemberPreferences, WorkplacePolicy,
};
use crate::services::store::{MemberStore, StoreError};

/// Member row as stored; label columns are free text
#[derive(Debug, Clone, FromRow)]
struct MemberRow {
    id: i64,
    nickname: String,
    gender: Option<String>,
    birth_year: Option<i32>,
    residence: Option<String>,
    smoking_status: Option<String>,
    religion: Option<String>,
    workplace: Option<String>,
    is_active: bool,
    preferred_gender: Option<String>,
    preferred_birth_year_min: Option<i32>,
    preferred_birth_year_max: Option<i32>,
    preferred_smoking: Option<String>,
    preferred_religion: Option<String>,
    workplace_matching: Option<String>,
    additional_matching_condition: Option<String>,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Member {
            id: row.id,
            nickname: row.nickname,
            gender: resolve_opt(row.gender.as_deref()),
            birth_year: row.birth_year,
            residence: row.residence,
            smoking_status: resolve_opt(row.smoking_status.as_deref()),
            religion: resolve_opt(row.religion.as_deref()),
            workplace: row.workplace,
            is_active: row.is_active,
            preferences: MemberPreferences {
                gender: resolve_opt(row.preferred_gender.as_deref()),
                birth_year: BirthYearRange::new(
                    row.preferred_birth_year_min,
                    row.preferred_birth_year_max,
                ),
                smoking: LabelSet::parse_csv(row.preferred_smoking.as_deref()),
                religion: LabelSet::parse_csv(row.preferred_religion.as_deref()),
                workplace_policy: WorkplacePolicy::from_label(row.workplace_matching.as_deref()),
                notes: row.additional_matching_condition,
            },
        }
    }
}

/// PostgreSQL-backed member store
///
/// Reads members and the presentation log. Consent gating happens here:
/// only active members who gave both consents are listed.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

impl MemberStore for PostgresStore {
    async fn list_active_members(
        &self,
        exclude_id: Option<MemberId>,
    ) -> Result<Vec<Member>, StoreError> {
        let query = r#"
            SELECT id, nickname, gender, birth_year, residence, smoking_status, religion,
                   workplace, is_active, preferred_gender, preferred_birth_year_min,
                   preferred_birth_year_max, preferred_smoking, preferred_religion,
                   workplace_matching, additional_matching_condition
            FROM members
            WHERE is_active
              AND privacy_consent
              AND confidentiality_consent
              AND ($1::BIGINT IS NULL OR id <> $1)
            ORDER BY id
        "#;

        let rows: Vec<MemberRow> = sqlx::query_as(query)
            .bind(exclude_id)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Loaded {} active members", rows.len());

        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn exposure_stats_for_all(&self) -> Result<ExposureSnapshot, StoreError> {
        let query = r#"
            SELECT candidate_id,
                   COUNT(*) AS presented_count,
                   MAX(presented_at) AS last_presented_at
            FROM presentations
            GROUP BY candidate_id
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| -> Result<(MemberId, ExposureStats), StoreError> {
                let candidate_id: i64 = row.try_get("candidate_id")?;
                let count: i64 = row.try_get("presented_count")?;
                let last_presented_at: Option<DateTime<Utc>> = row.try_get("last_presented_at")?;
                let presented_count = u64::try_from(count).map_err(|_| {
                    StoreError::InvalidRow(format!(
                        "negative presentation count for candidate {candidate_id}"
                    ))
                })?;

                Ok((
                    candidate_id,
                    ExposureStats {
                        presented_count,
                        last_presented_at,
                    },
                ))
            })
            .collect()
    }

    async fn recently_presented_to(
        &self,
        subject_id: MemberId,
        since: DateTime<Utc>,
    ) -> Result<CooldownSet, StoreError> {
        let query = r#"
            SELECT DISTINCT candidate_id
            FROM presentations
            WHERE requester_id = $1 AND presented_at >= $2
        "#;

        // timestamptz cannot hold chrono's earliest instants
        let since = since.max(DateTime::<Utc>::UNIX_EPOCH);

        let rows = sqlx::query(query)
            .bind(subject_id)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        let recent = rows
            .iter()
            .map(|row| row.try_get::<i64, _>("candidate_id"))
            .collect::<Result<CooldownSet, _>>()?;

        tracing::debug!(
            "Member {} has {} candidates in cooldown since {}",
            subject_id,
            recent.len(),
            since
        );

        Ok(recent)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
