use std::collections::{BTreeSet, HashMap};

use crate::core::matcher::Matcher;
use crate::models::{Assignment, CandidateResult, CooldownSet, ExposureSnapshot, Member, MemberId};

/// Greedy one-to-one assignment over all subjects
///
/// Subjects are visited in ascending id order and each takes the best-ranked
/// candidate nobody earlier has claimed. There is no backtracking, so the
/// result is deterministic but not a maximum matching: an early subject can
/// take the only candidate a later subject could have used.
#[derive(Debug, Clone, Default)]
pub struct Planner {
    matcher: Matcher,
}

impl Planner {
    pub fn new(matcher: Matcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Plan without cooldowns
    pub fn plan_bulk(
        &self,
        subjects: &[Member],
        pool: &[Member],
        exposure: &ExposureSnapshot,
    ) -> Vec<Assignment> {
        self.plan_bulk_with_cooldowns(subjects, pool, exposure, &HashMap::new())
    }

    /// Plan with a per-subject cooldown set; subjects without an entry have
    /// no cooldown.
    pub fn plan_bulk_with_cooldowns(
        &self,
        subjects: &[Member],
        pool: &[Member],
        exposure: &ExposureSnapshot,
        cooldowns: &HashMap<MemberId, CooldownSet>,
    ) -> Vec<Assignment> {
        let mut ordered: Vec<&Member> = subjects.iter().collect();
        ordered.sort_by_key(|subject| subject.id);
        ordered.dedup_by_key(|subject| subject.id);

        let no_cooldown = CooldownSet::empty();
        let mut claimed = BTreeSet::new();

        let assignments: Vec<Assignment> = ordered
            .into_iter()
            .map(|subject| {
                let cooldown = cooldowns.get(&subject.id).unwrap_or(&no_cooldown);
                let ranked = self.matcher.rank_candidates(subject, pool, exposure, cooldown);

                Assignment {
                    subject_id: subject.id,
                    candidate_id: claim_first_unclaimed(&ranked, &mut claimed),
                }
            })
            .collect();

        tracing::debug!(
            "Bulk plan: {} subjects, {} assigned",
            assignments.len(),
            claimed.len()
        );

        assignments
    }
}

/// Take the first ranked candidate not yet in `claimed` and record it
pub fn claim_first_unclaimed(
    ranked: &[CandidateResult],
    claimed: &mut BTreeSet<MemberId>,
) -> Option<MemberId> {
    let candidate_id = ranked
        .iter()
        .map(|result| result.candidate_id)
        .find(|id| !claimed.contains(id))?;
    claimed.insert(candidate_id);
    Some(candidate_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExposureStats, Gender};

    fn create_member(id: i64, gender: Gender) -> Member {
        let mut member = Member::new(id, format!("member{id}"));
        member.gender = Some(gender);
        member
    }

    fn ranked(ids: &[i64]) -> Vec<CandidateResult> {
        ids.iter()
            .map(|&id| CandidateResult {
                candidate_id: id,
                score: 0.0,
                reasons: BTreeSet::new(),
                exposure: ExposureStats::default(),
            })
            .collect()
    }

    #[test]
    fn test_claim_first_unclaimed() {
        let mut claimed = BTreeSet::from([2]);

        assert_eq!(claim_first_unclaimed(&ranked(&[2, 5, 3]), &mut claimed), Some(5));
        assert!(claimed.contains(&5));
        assert_eq!(claim_first_unclaimed(&ranked(&[2, 5]), &mut claimed), None);
        assert_eq!(claim_first_unclaimed(&[], &mut claimed), None);
    }

    #[test]
    fn test_plan_visits_subjects_in_id_order() {
        let planner = Planner::default();
        let members = vec![
            create_member(3, Gender::Female),
            create_member(1, Gender::Male),
            create_member(2, Gender::Male),
        ];

        let plan = planner.plan_bulk(&members, &members, &ExposureSnapshot::new());

        assert_eq!(
            plan,
            vec![
                Assignment { subject_id: 1, candidate_id: Some(3) },
                Assignment { subject_id: 2, candidate_id: None },
                Assignment { subject_id: 3, candidate_id: Some(1) },
            ]
        );
    }

    #[test]
    fn test_plan_never_assigns_candidate_twice() {
        let planner = Planner::default();
        let members: Vec<Member> = (1..=9)
            .map(|id| create_member(id, if id % 3 == 0 { Gender::Female } else { Gender::Male }))
            .collect();

        let plan = planner.plan_bulk(&members, &members, &ExposureSnapshot::new());

        let assigned: Vec<i64> = plan.iter().filter_map(|a| a.candidate_id).collect();
        let unique: BTreeSet<i64> = assigned.iter().copied().collect();
        assert_eq!(assigned.len(), unique.len());
        assert_eq!(plan.len(), 9);
    }

    #[test]
    fn test_duplicate_subjects_planned_once() {
        let planner = Planner::default();
        let members = vec![
            create_member(1, Gender::Male),
            create_member(2, Gender::Female),
            create_member(3, Gender::Female),
        ];
        let subjects = vec![
            members[0].clone(),
            members[0].clone(),
            members[1].clone(),
            members[0].clone(),
        ];

        let plan = planner.plan_bulk(&subjects, &members, &ExposureSnapshot::new());

        assert_eq!(
            plan,
            vec![
                Assignment { subject_id: 1, candidate_id: Some(2) },
                Assignment { subject_id: 2, candidate_id: Some(1) },
            ]
        );
    }

    #[test]
    fn test_plan_respects_cooldowns() {
        let planner = Planner::default();
        let members = vec![
            create_member(1, Gender::Male),
            create_member(2, Gender::Female),
            create_member(3, Gender::Female),
        ];
        let cooldowns = HashMap::from([(1, [2].into_iter().collect::<CooldownSet>())]);

        let plan = planner.plan_bulk_with_cooldowns(
            &members[..1],
            &members,
            &ExposureSnapshot::new(),
            &cooldowns,
        );

        assert_eq!(plan, vec![Assignment { subject_id: 1, candidate_id: Some(3) }]);
    }

    #[test]
    fn test_plan_empty_pool() {
        let planner = Planner::default();
        let subjects = vec![create_member(1, Gender::Male)];

        let plan = planner.plan_bulk(&subjects, &[], &ExposureSnapshot::new());

        assert_eq!(plan, vec![Assignment { subject_id: 1, candidate_id: None }]);
    }
}
