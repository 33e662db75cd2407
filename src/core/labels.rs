//! Free-text label normalization.
//!
//! Member attributes and multi-valued preferences arrive from the store as
//! loosely typed strings ("비흡연", "Non-Smoker", "기독교, 천주교"). Each
//! category maps them to canonical values through the same ordered rules:
//!
//! 1. exact match on the canonical label
//! 2. synonym table
//! 3. substring rules, first hit wins
//!
//! Anything that survives none of the rules is unrecognized and is kept out of
//! the accepted set, so it can never widen a preference.

use std::collections::BTreeSet;

use crate::models::{Gender, Religion, SmokingStatus, WorkplacePolicy};

/// A closed category with a canonical label per value
pub trait CanonicalLabel: Copy + Ord + 'static {
    const ALL: &'static [Self];
    const SYNONYMS: &'static [(&'static str, Self)];
    /// Checked in order; put longer or negated needles first.
    const SUBSTRING_RULES: &'static [(&'static str, Self)];

    fn label(self) -> &'static str;
}

/// Map a raw label onto its canonical value
pub fn resolve<T: CanonicalLabel>(raw: &str) -> Option<T> {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    if let Some(value) = T::ALL.iter().copied().find(|v| v.label() == needle) {
        return Some(value);
    }

    if let Some((_, value)) = T::SYNONYMS.iter().find(|(synonym, _)| *synonym == needle) {
        return Some(*value);
    }

    T::SUBSTRING_RULES
        .iter()
        .find(|(fragment, _)| needle.contains(fragment))
        .map(|(_, value)| *value)
}

/// Resolve an optional store column; empty and unknown both read as absent
pub fn resolve_opt<T: CanonicalLabel>(raw: Option<&str>) -> Option<T> {
    raw.and_then(resolve)
}

/// Set of accepted canonical labels.
///
/// An empty set means "no preference". Entries that failed to resolve are
/// remembered so the preference stays constrained even when nothing in it
/// was recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet<T: CanonicalLabel> {
    accepted: BTreeSet<T>,
    unrecognized: BTreeSet<String>,
}

impl<T: CanonicalLabel> Default for LabelSet<T> {
    fn default() -> Self {
        Self {
            accepted: BTreeSet::new(),
            unrecognized: BTreeSet::new(),
        }
    }
}

impl<T: CanonicalLabel> LabelSet<T> {
    /// No preference
    pub fn any() -> Self {
        Self::default()
    }

    pub fn of(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            accepted: values.into_iter().collect(),
            unrecognized: BTreeSet::new(),
        }
    }

    /// Parse a comma-delimited column value
    pub fn parse_csv(raw: Option<&str>) -> Self {
        raw.map(|raw| Self::parse_all(raw.split(',')))
            .unwrap_or_default()
    }

    pub fn parse_all<'a>(raws: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = Self::default();
        for raw in raws {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            match resolve::<T>(trimmed) {
                Some(value) => {
                    set.accepted.insert(value);
                }
                None => {
                    set.unrecognized.insert(trimmed.to_string());
                }
            }
        }
        set
    }

    pub fn is_constrained(&self) -> bool {
        !self.accepted.is_empty() || !self.unrecognized.is_empty()
    }

    /// Unconstrained sets accept anything, including a missing value
    pub fn accepts(&self, value: Option<T>) -> bool {
        if !self.is_constrained() {
            return true;
        }
        value.is_some_and(|v| self.accepted.contains(&v))
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.accepted.iter().copied()
    }

    pub fn unrecognized(&self) -> impl Iterator<Item = &str> {
        self.unrecognized.iter().map(String::as_str)
    }
}

impl<T: CanonicalLabel> FromIterator<T> for LabelSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::of(iter)
    }
}

impl CanonicalLabel for Gender {
    const ALL: &'static [Self] = &[Gender::Male, Gender::Female];
    const SYNONYMS: &'static [(&'static str, Self)] = &[
        ("m", Gender::Male),
        ("man", Gender::Male),
        ("남", Gender::Male),
        ("남성", Gender::Male),
        ("남자", Gender::Male),
        ("f", Gender::Female),
        ("woman", Gender::Female),
        ("여", Gender::Female),
        ("여성", Gender::Female),
        ("여자", Gender::Female),
    ];
    const SUBSTRING_RULES: &'static [(&'static str, Self)] = &[
        ("female", Gender::Female),
        ("woman", Gender::Female),
        ("여", Gender::Female),
        ("male", Gender::Male),
        ("남", Gender::Male),
    ];

    fn label(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl CanonicalLabel for SmokingStatus {
    const ALL: &'static [Self] = &[
        SmokingStatus::Smoker,
        SmokingStatus::NonSmoker,
        SmokingStatus::Occasional,
    ];
    const SYNONYMS: &'static [(&'static str, Self)] = &[
        ("흡연", SmokingStatus::Smoker),
        ("smoking", SmokingStatus::Smoker),
        ("yes", SmokingStatus::Smoker),
        ("비흡연", SmokingStatus::NonSmoker),
        ("non-smoker", SmokingStatus::NonSmoker),
        ("nonsmoker", SmokingStatus::NonSmoker),
        ("no", SmokingStatus::NonSmoker),
        ("가끔", SmokingStatus::Occasional),
        ("sometimes", SmokingStatus::Occasional),
        ("social", SmokingStatus::Occasional),
    ];
    const SUBSTRING_RULES: &'static [(&'static str, Self)] = &[
        ("비흡연", SmokingStatus::NonSmoker),
        ("금연", SmokingStatus::NonSmoker),
        ("non", SmokingStatus::NonSmoker),
        ("가끔", SmokingStatus::Occasional),
        ("occasion", SmokingStatus::Occasional),
        ("흡연", SmokingStatus::Smoker),
        ("smok", SmokingStatus::Smoker),
    ];

    fn label(self) -> &'static str {
        match self {
            SmokingStatus::Smoker => "smoker",
            SmokingStatus::NonSmoker => "non_smoker",
            SmokingStatus::Occasional => "occasional",
        }
    }
}

impl CanonicalLabel for Religion {
    const ALL: &'static [Self] = &[
        Religion::NoReligion,
        Religion::Christian,
        Religion::Catholic,
        Religion::Buddhist,
        Religion::Other,
    ];
    const SYNONYMS: &'static [(&'static str, Self)] = &[
        ("무교", Religion::NoReligion),
        ("없음", Religion::NoReligion),
        ("none", Religion::NoReligion),
        ("atheist", Religion::NoReligion),
        ("기독교", Religion::Christian),
        ("개신교", Religion::Christian),
        ("protestant", Religion::Christian),
        ("천주교", Religion::Catholic),
        ("가톨릭", Religion::Catholic),
        ("불교", Religion::Buddhist),
        ("buddhism", Religion::Buddhist),
        ("기타", Religion::Other),
    ];
    const SUBSTRING_RULES: &'static [(&'static str, Self)] = &[
        ("무교", Religion::NoReligion),
        ("천주", Religion::Catholic),
        ("가톨릭", Religion::Catholic),
        ("catholic", Religion::Catholic),
        ("기독", Religion::Christian),
        ("개신", Religion::Christian),
        ("christ", Religion::Christian),
        ("불교", Religion::Buddhist),
        ("buddh", Religion::Buddhist),
    ];

    fn label(self) -> &'static str {
        match self {
            Religion::NoReligion => "no_religion",
            Religion::Christian => "christian",
            Religion::Catholic => "catholic",
            Religion::Buddhist => "buddhist",
            Religion::Other => "other",
        }
    }
}

impl CanonicalLabel for WorkplacePolicy {
    const ALL: &'static [Self] = &[WorkplacePolicy::Allowed, WorkplacePolicy::Forbidden];
    const SYNONYMS: &'static [(&'static str, Self)] = &[
        ("같은 직장 가능", WorkplacePolicy::Allowed),
        ("possible", WorkplacePolicy::Allowed),
        ("allow", WorkplacePolicy::Allowed),
        ("같은 직장 불가능", WorkplacePolicy::Forbidden),
        ("impossible", WorkplacePolicy::Forbidden),
        ("forbid", WorkplacePolicy::Forbidden),
    ];
    const SUBSTRING_RULES: &'static [(&'static str, Self)] = &[
        ("불가", WorkplacePolicy::Forbidden),
        ("impossible", WorkplacePolicy::Forbidden),
        ("forbid", WorkplacePolicy::Forbidden),
        ("not", WorkplacePolicy::Forbidden),
        ("가능", WorkplacePolicy::Allowed),
        ("possible", WorkplacePolicy::Allowed),
        ("allow", WorkplacePolicy::Allowed),
    ];

    fn label(self) -> &'static str {
        match self {
            WorkplacePolicy::Allowed => "allowed",
            WorkplacePolicy::Forbidden => "forbidden",
        }
    }
}

impl WorkplacePolicy {
    /// Missing policy is permissive; a policy nobody can read is treated as
    /// `Forbidden`.
    pub fn from_label(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|r| !r.is_empty()) {
            None => WorkplacePolicy::Allowed,
            Some(raw) => resolve(raw).unwrap_or(WorkplacePolicy::Forbidden),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_synonym_substring() {
        assert_eq!(resolve::<SmokingStatus>("non_smoker"), Some(SmokingStatus::NonSmoker));
        assert_eq!(resolve::<SmokingStatus>("비흡연"), Some(SmokingStatus::NonSmoker));
        assert_eq!(resolve::<SmokingStatus>("흡연"), Some(SmokingStatus::Smoker));
        assert_eq!(resolve::<SmokingStatus>("Non Smoking"), Some(SmokingStatus::NonSmoker));
        assert_eq!(resolve::<SmokingStatus>("  Occasionally "), Some(SmokingStatus::Occasional));
        assert_eq!(resolve::<SmokingStatus>("vape"), None);
        assert_eq!(resolve::<SmokingStatus>(""), None);
    }

    #[test]
    fn test_gender_substring_order() {
        assert_eq!(resolve::<Gender>("Female"), Some(Gender::Female));
        assert_eq!(resolve::<Gender>("a woman"), Some(Gender::Female));
        assert_eq!(resolve::<Gender>("M"), Some(Gender::Male));
        assert_eq!(resolve::<Gender>("남성"), Some(Gender::Male));
    }

    #[test]
    fn test_religion_lookup() {
        assert_eq!(resolve::<Religion>("천주교"), Some(Religion::Catholic));
        assert_eq!(resolve::<Religion>("Roman Catholic"), Some(Religion::Catholic));
        assert_eq!(resolve::<Religion>("기독교"), Some(Religion::Christian));
        assert_eq!(resolve::<Religion>("무교"), Some(Religion::NoReligion));
    }

    #[test]
    fn test_csv_parsing() {
        let set = LabelSet::<SmokingStatus>::parse_csv(Some("비흡연, 가끔,,"));
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![SmokingStatus::NonSmoker, SmokingStatus::Occasional]
        );
        assert!(set.accepts(Some(SmokingStatus::Occasional)));
        assert!(!set.accepts(Some(SmokingStatus::Smoker)));
        assert!(!set.accepts(None));
    }

    #[test]
    fn test_empty_set_is_permissive() {
        let set = LabelSet::<Religion>::parse_csv(Some(" , "));
        assert!(!set.is_constrained());
        assert!(set.accepts(None));
        assert!(set.accepts(Some(Religion::Other)));
    }

    #[test]
    fn test_unrecognized_only_set_accepts_nothing() {
        let set = LabelSet::<Religion>::parse_csv(Some("pastafarian"));
        assert!(set.is_constrained());
        assert!(!set.accepts(Some(Religion::Other)));
        assert_eq!(set.unrecognized().collect::<Vec<_>>(), vec!["pastafarian"]);
    }

    #[test]
    fn test_workplace_policy_labels() {
        assert_eq!(WorkplacePolicy::from_label(None), WorkplacePolicy::Allowed);
        assert_eq!(
            WorkplacePolicy::from_label(Some("같은 직장 불가능")),
            WorkplacePolicy::Forbidden
        );
        assert_eq!(
            WorkplacePolicy::from_label(Some("같은 직장 가능")),
            WorkplacePolicy::Allowed
        );
        assert_eq!(WorkplacePolicy::from_label(Some("???")), WorkplacePolicy::Forbidden);
    }
}
