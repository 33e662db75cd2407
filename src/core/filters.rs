use crate::core::workplace::same_workplace;
use crate::models::{CooldownSet, Member, WorkplacePolicy};

/// Check if `other` meets every preference `subject` has declared
///
/// Preferences that are not set impose no restriction.
#[inline]
pub fn satisfies(subject: &Member, other: &Member) -> bool {
    let prefs = &subject.preferences;

    // Desired counterpart gender
    if let Some(wanted) = prefs.gender {
        if other.gender != Some(wanted) {
            return false;
        }
    }

    // Birth-year range
    if prefs.birth_year.is_set() && !prefs.birth_year.contains(other.birth_year) {
        return false;
    }

    if !prefs.smoking.accepts(other.smoking_status) {
        return false;
    }

    if !prefs.religion.accepts(other.religion) {
        return false;
    }

    // Same employer
    if prefs.workplace_policy == WorkplacePolicy::Forbidden {
        if let (Some(mine), Some(theirs)) = (subject.workplace(), other.workplace()) {
            if same_workplace(mine, theirs) {
                return false;
            }
        }
    }

    true
}

/// Both members have a declared, differing gender and accept each other
#[inline]
pub fn mutually_compatible(a: &Member, b: &Member) -> bool {
    match (a.gender, b.gender) {
        (Some(ga), Some(gb)) if ga != gb => satisfies(a, b) && satisfies(b, a),
        _ => false,
    }
}

/// Drop every candidate shown to the subject inside the cooldown window
pub fn exclude_recent<'a>(
    pool: impl IntoIterator<Item = &'a Member>,
    cooldown: &CooldownSet,
) -> Vec<&'a Member> {
    pool.into_iter()
        .filter(|candidate| !cooldown.contains(candidate.id))
        .collect()
}
