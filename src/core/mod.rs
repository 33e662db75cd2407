// Core algorithm exports
pub mod filters;
pub mod labels;
pub mod matcher;
pub mod planner;
pub mod ranking;
pub mod scoring;
pub mod workplace;

pub use filters::{exclude_recent, mutually_compatible, satisfies};
pub use labels::{CanonicalLabel, LabelSet};
pub use matcher::{MatchError, Matcher};
pub use planner::{claim_first_unclaimed, Planner};
pub use ranking::rank_by_exposure;
pub use scoring::calculate_match_score;
pub use workplace::{normalize, same_workplace};
