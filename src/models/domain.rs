use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::core::labels::LabelSet;

/// Member identifier as stored by the member store
pub type MemberId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    Smoker,
    NonSmoker,
    Occasional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Religion {
    NoReligion,
    Christian,
    Catholic,
    Buddhist,
    Other,
}

/// A member's stance on being introduced to someone from the same employer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkplacePolicy {
    #[default]
    Allowed,
    Forbidden,
}

/// Preferred birth-year range; either bound may be missing and the bounds
/// may arrive swapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BirthYearRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl BirthYearRange {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        Self { min, max }
    }

    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Swap the bounds when both are present and out of order
    pub fn normalized(&self) -> Self {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) if lo > hi => Self::new(Some(hi), Some(lo)),
            _ => *self,
        }
    }

    /// Inclusive, possibly one-sided containment. A missing year never fits.
    pub fn contains(&self, year: Option<i32>) -> bool {
        let Some(year) = year else {
            return false;
        };
        let range = self.normalized();
        range.min.map_or(true, |lo| year >= lo) && range.max.map_or(true, |hi| year <= hi)
    }
}

/// What a member asks of a counterpart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberPreferences {
    pub gender: Option<Gender>,
    pub birth_year: BirthYearRange,
    pub smoking: LabelSet<SmokingStatus>,
    pub religion: LabelSet<Religion>,
    pub workplace_policy: WorkplacePolicy,
    pub notes: Option<String>,
}

/// Member snapshot as handed to the matching engine
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: MemberId,
    pub nickname: String,
    pub gender: Option<Gender>,
    pub birth_year: Option<i32>,
    pub residence: Option<String>,
    pub smoking_status: Option<SmokingStatus>,
    pub religion: Option<Religion>,
    pub workplace: Option<String>,
    pub is_active: bool,
    pub preferences: MemberPreferences,
}

impl Member {
    /// Active member with no attributes and no preferences
    pub fn new(id: MemberId, nickname: impl Into<String>) -> Self {
        Self {
            id,
            nickname: nickname.into(),
            gender: None,
            birth_year: None,
            residence: None,
            smoking_status: None,
            religion: None,
            workplace: None,
            is_active: true,
            preferences: MemberPreferences::default(),
        }
    }

    pub fn residence(&self) -> Option<&str> {
        self.residence.as_deref().map(str::trim).filter(|r| !r.is_empty())
    }

    pub fn workplace(&self) -> Option<&str> {
        self.workplace.as_deref().map(str::trim).filter(|w| !w.is_empty())
    }
}

/// How often and how recently a member has been shown as a candidate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureStats {
    #[serde(rename = "presentedCount")]
    pub presented_count: u64,
    #[serde(rename = "lastPresentedAt")]
    pub last_presented_at: Option<DateTime<Utc>>,
}

/// Exposure stats for every candidate; ids never presented read as zero
#[derive(Debug, Clone, Default)]
pub struct ExposureSnapshot {
    stats: HashMap<MemberId, ExposureStats>,
}

impl ExposureSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, candidate_id: MemberId, stats: ExposureStats) {
        self.stats.insert(candidate_id, stats);
    }

    pub fn get(&self, candidate_id: MemberId) -> ExposureStats {
        self.stats.get(&candidate_id).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

impl FromIterator<(MemberId, ExposureStats)> for ExposureSnapshot {
    fn from_iter<I: IntoIterator<Item = (MemberId, ExposureStats)>>(iter: I) -> Self {
        Self {
            stats: iter.into_iter().collect(),
        }
    }
}

/// Candidates shown to one subject inside the trailing cooldown window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CooldownSet {
    ids: HashSet<MemberId>,
}

impl CooldownSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, candidate_id: MemberId) -> bool {
        self.ids.contains(&candidate_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<MemberId> for CooldownSet {
    fn from_iter<I: IntoIterator<Item = MemberId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Why a candidate scored above zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchReason {
    NearbyResidence,
}

/// Ranked recommendation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    #[serde(rename = "candidateId")]
    pub candidate_id: MemberId,
    pub score: f64,
    pub reasons: BTreeSet<MatchReason>,
    pub exposure: ExposureStats,
}

/// One line of a bulk plan; `None` means nobody eligible was left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "subjectId")]
    pub subject_id: MemberId,
    #[serde(rename = "candidateId")]
    pub candidate_id: Option<MemberId>,
}

/// Scoring weights
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub residence_proximity: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            residence_proximity: 0.1,
        }
    }
}
