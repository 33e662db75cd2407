// Integration tests for Intro Algo

use intro_algo::core::{Matcher, Planner};
use intro_algo::models::{
    Assignment, BirthYearRange, CooldownSet, ExposureSnapshot, ExposureStats, Gender, Member, WorkplacePolicy,
};
use intro_algo::services::{InMemoryStore, MatchOptions, MatchService, ServiceError, SubjectRef};
use chrono::{Duration, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

fn create_test_member(id: i64, gender: Gender, residence: &str) -> Member {
    let mut member = Member::new(id, format!("member{}", id));
    member.gender = Some(gender);
    member.birth_year = Some(1990 + (id % 8) as i32);
    member.residence = Some(residence.to_string());
    member
}

fn service(store: InMemoryStore) -> MatchService<InMemoryStore> {
    MatchService::new(
        Arc::new(store),
        Matcher::with_default_weights(),
        MatchOptions::default(),
    )
}

#[test]
fn test_end_to_end_fairness_scenario() {
    let matcher = Matcher::with_default_weights();
    let members = vec![
        create_test_member(1, Gender::Male, "Seoul"),
        create_test_member(2, Gender::Female, "Seoul"),
        create_test_member(3, Gender::Female, "Seoul"),
    ];
    let exposure: ExposureSnapshot = [
        (
            2,
            ExposureStats {
                presented_count: 3,
                last_presented_at: Some(Utc::now() - Duration::days(4)),
            },
        ),
        (3, ExposureStats::default()),
    ]
    .into_iter()
    .collect();

    let results = matcher
        .recommend(&members[0], &members, &exposure, &CooldownSet::empty(), 10)
        .unwrap();

    let ids: Vec<i64> = results.iter().map(|r| r.candidate_id).collect();
    assert_eq!(ids, vec![3, 2]);
}

#[test]
fn test_score_breaks_exposure_ties() {
    let matcher = Matcher::with_default_weights();
    let subject = create_test_member(1, Gender::Male, "Busan Haeundae");
    let pool = vec![
        create_test_member(2, Gender::Female, "Seoul"),
        create_test_member(3, Gender::Female, "Busan"),
    ];

    let results = matcher
        .recommend(&subject, &pool, &ExposureSnapshot::new(), &CooldownSet::empty(), 10)
        .unwrap();

    assert_eq!(results[0].candidate_id, 3);
    assert_eq!(results[0].score, 0.1);
    assert_eq!(results[1].score, 0.0);
}

#[tokio::test]
async fn test_cooldown_days_control_exclusion() {
    let now = Utc::now();
    let store = InMemoryStore::new(vec![
        create_test_member(1, Gender::Male, "Seoul"),
        create_test_member(2, Gender::Female, "Seoul"),
    ])
    .with_presentation(1, 2, now - Duration::days(2));
    let svc = service(store);
    let subject = SubjectRef::Id(1);

    let long_window = svc.recommend_at(&subject, None, Some(30), now).await.unwrap();
    assert!(long_window.candidates.is_empty());

    let short_window = svc.recommend_at(&subject, None, Some(1), now).await.unwrap();
    assert_eq!(short_window.candidates.len(), 1);
    assert_eq!(short_window.candidates[0].candidate_id, 2);
    assert_eq!(short_window.candidates[0].exposure.presented_count, 1);
}

#[tokio::test]
async fn test_colleagues_never_recommended() {
    let mut subject = create_test_member(1, Gender::Male, "Seoul");
    subject.workplace = Some("Acme Corp Inc.".to_string());
    subject.preferences.workplace_policy = WorkplacePolicy::Forbidden;

    let mut colleague = create_test_member(2, Gender::Female, "Seoul");
    colleague.workplace = Some("(Acme) Corp".to_string());
    let mut outsider = create_test_member(3, Gender::Female, "Seoul");
    outsider.workplace = Some("Zenith Partners".to_string());

    let svc = service(InMemoryStore::new(vec![subject, colleague, outsider]));
    let rec = svc.recommend(&SubjectRef::Id(1), None, None).await.unwrap();

    let ids: Vec<i64> = rec.candidates.iter().map(|c| c.candidate_id).collect();
    assert_eq!(ids, vec![3]);
}

#[tokio::test]
async fn test_inactive_subject_not_found() {
    let mut dormant = create_test_member(1, Gender::Male, "Seoul");
    dormant.is_active = false;
    let svc = service(InMemoryStore::new(vec![
        dormant,
        create_test_member(2, Gender::Female, "Seoul"),
    ]));

    let err = svc
        .recommend(&SubjectRef::Nickname("member1".to_string()), None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::SubjectNotFound(_)));
}

#[tokio::test]
async fn test_bulk_plan_is_deterministic_and_unique() {
    let members: Vec<Member> = (1..=24)
        .map(|id| {
            let gender = if id % 3 == 0 { Gender::Female } else { Gender::Male };
            create_test_member(id, gender, if id % 2 == 0 { "Seoul" } else { "Busan" })
        })
        .collect();
    let now = Utc::now();
    let store = InMemoryStore::new(members)
        .with_presentation(1, 3, now - Duration::days(3))
        .with_presentation(2, 6, now - Duration::days(40));
    let svc = service(store);

    let first = svc.plan_bulk_at(Some(30), now).await.unwrap();
    let second = svc.plan_bulk_at(Some(30), now).await.unwrap();

    assert_eq!(first.assignments, second.assignments);
    assert_eq!(first.assignments.len(), 24);

    let assigned: Vec<i64> = first
        .assignments
        .iter()
        .filter_map(|a| a.candidate_id)
        .collect();
    let unique: BTreeSet<i64> = assigned.iter().copied().collect();
    assert_eq!(assigned.len(), unique.len());

    let subjects: Vec<i64> = first.assignments.iter().map(|a| a.subject_id).collect();
    assert!(subjects.windows(2).all(|w| w[0] < w[1]));
    assert_ne!(first.assignments[0].candidate_id, Some(3));
}

#[test]
fn test_bulk_plan_is_greedy_not_maximal() {
    // 2 only accepts 4, but 1 goes first and prefers 4 for the shared residence
    let planner = Planner::default();
    let mut picky = create_test_member(2, Gender::Male, "Seoul");
    picky.preferences.birth_year = BirthYearRange::new(Some(1994), Some(1994));
    let members = vec![
        create_test_member(1, Gender::Male, "Seoul"),
        picky,
        create_test_member(3, Gender::Female, "Busan"),
        create_test_member(4, Gender::Female, "Seoul"),
    ];

    let plan = planner.plan_bulk(&members, &members, &ExposureSnapshot::new());

    assert_eq!(plan[0], Assignment { subject_id: 1, candidate_id: Some(4) });
    assert_eq!(plan[1], Assignment { subject_id: 2, candidate_id: None });
}
