//! End-to-end coverage of accumulation, ranking, blacklist filtering,
//! score inspection and cancellation, driven by literal score fragments.

mod common;

use common::{Fixture, capped_seed, literal_seed};
use pq::search::{CancelToken, SearchEngine, SearchTuning};
use pq::storage::blacklist;
use pq::{PqError, criterion::QuerySeed};

fn engine(fixture: &Fixture) -> SearchEngine<'_> {
    SearchEngine::new(&fixture.db, SearchTuning::default())
}

#[test]
fn test_empty_criteria_yield_empty_result() {
    let fixture = Fixture::new();
    let mut engine = engine(&fixture);
    assert_eq!(engine.search(10, &[]).unwrap(), Vec::<i64>::new());
    assert_eq!(engine.search_seeds(10, &[]).unwrap(), Vec::<i64>::new());
}

#[test]
fn test_weighted_aggregation_orders_by_total() {
    let fixture = Fixture::new();
    fixture.add_poses(&[1, 2, 3, 4, 5]);

    let first = literal_seed(
        &[(1, 0.9), (2, 0.2), (3, 0.5), (4, 0.0), (5, 1.0)],
        1.0,
    );
    let second = literal_seed(
        &[(1, 0.1), (2, 0.8), (3, 0.5), (4, 1.0), (5, 0.0)],
        0.5,
    );

    // totals: p1=0.95, p2=0.6, p3=0.75, p4=0.5, p5=1.0
    let mut engine = engine(&fixture);
    let ranked = engine.search_seeds(10, &[first, second]).unwrap();
    assert_eq!(ranked, vec![5, 1, 3, 2, 4]);
}

#[test]
fn test_limit_truncates_after_aggregation() {
    let fixture = Fixture::new();
    fixture.add_poses(&[1, 2, 3]);

    let seed = literal_seed(&[(1, 0.3), (2, 0.9), (3, 0.6)], 1.0);
    let mut engine = engine(&fixture);
    assert_eq!(engine.search_seeds(2, &[seed]).unwrap(), vec![2, 3]);
}

#[test]
fn test_blacklisted_file_is_filtered_out() {
    let fixture = Fixture::new();
    fixture.add_poses(&[1, 2, 3]);

    let seed = literal_seed(&[(1, 0.5), (2, 1.0), (3, 0.7)], 1.0);
    let mut engine = engine(&fixture);
    assert_eq!(engine.search_seeds(10, &[seed.clone()]).unwrap(), vec![2, 3, 1]);

    blacklist::add_pose(&fixture.db, 2).unwrap();
    assert_eq!(engine.search_seeds(10, &[seed]).unwrap(), vec![3, 1]);
}

#[test]
fn test_equal_totals_break_ties_by_pose_id() {
    let fixture = Fixture::new();
    fixture.add_poses(&[7, 3, 9]);

    let seed = literal_seed(&[(7, 1.0), (3, 1.0), (9, 1.0)], 1.0);
    let mut engine = engine(&fixture);
    assert_eq!(engine.search_seeds(10, &[seed]).unwrap(), vec![3, 7, 9]);
}

#[test]
fn test_growth_loop_widens_past_the_requested_limit() {
    let fixture = Fixture::new();
    let ids: Vec<i64> = (1..=10).collect();
    fixture.add_poses(&ids);

    let scores: Vec<(i64, f64)> = ids.iter().map(|id| (*id, 1.0)).collect();
    let seed = capped_seed(&scores, 1.0);

    let mut engine = engine(&fixture);
    let ranked = engine.search_seeds(2, &[seed]).unwrap();
    assert_eq!(ranked, vec![1, 2]);

    // The candidate pool kept growing beyond the requested limit, so poses
    // outside the top two still carry scores.
    assert!(engine.score(10).is_ok());
}

#[test]
fn test_growth_loop_stops_at_the_quality_floor() {
    let fixture = Fixture::new();
    let ids: Vec<i64> = (1..=10).collect();
    fixture.add_poses(&ids);

    // Scores fall below the floor quickly; only the first cap's worth of
    // rows is ever materialized.
    let scores: Vec<(i64, f64)> = ids.iter().map(|id| (*id, 1.0 / (*id as f64))).collect();
    let seed = capped_seed(&scores, 1.0);

    let mut engine = SearchEngine::new(
        &fixture.db,
        SearchTuning {
            quality_floor: 0.25,
            ..SearchTuning::default()
        },
    );
    let ranked = engine.search_seeds(3, &[seed]).unwrap();
    assert_eq!(ranked, vec![1, 2, 3]);
    // Pose 10 scored 0.1, below the floor; it was never pulled in.
    assert!(matches!(engine.score(10), Err(PqError::NotFound(_))));
}

#[test]
fn test_score_breakdown_per_criterion() {
    let fixture = Fixture::new();
    fixture.add_poses(&[1, 2]);

    let first = literal_seed(&[(1, 0.9), (2, 0.2)], 1.0);
    let second = literal_seed(&[(1, 0.1)], 0.5);

    let mut engine = engine(&fixture);
    engine.search_seeds(10, &[first, second]).unwrap();

    let one = engine.score(1).unwrap();
    assert!((one.total - 0.95).abs() < 1e-9);
    assert_eq!(one.per_criterion.len(), 2);
    assert!((one.per_criterion[0] - 0.9).abs() < 1e-9);
    assert!((one.per_criterion[1] - 0.05).abs() < 1e-9);

    // Pose 2 was only scored by the first criterion; the second slot is
    // zero-filled.
    let two = engine.score(2).unwrap();
    assert!((two.per_criterion[1]).abs() < f64::EPSILON);

    assert!(matches!(engine.score(999), Err(PqError::NotFound(_))));
}

#[test]
fn test_score_requires_a_completed_search() {
    let fixture = Fixture::new();
    let engine = engine(&fixture);
    assert!(matches!(engine.score(1), Err(PqError::NotFound(_))));
}

#[test]
fn test_scores_survive_until_the_next_search() {
    let fixture = Fixture::new();
    fixture.add_poses(&[1, 2]);

    let mut engine = engine(&fixture);
    engine
        .search_seeds(10, &[literal_seed(&[(1, 0.9), (2, 0.2)], 1.0)])
        .unwrap();
    assert!(engine.score(2).is_ok());

    engine
        .search_seeds(10, &[literal_seed(&[(1, 0.9)], 1.0)])
        .unwrap();
    assert!(matches!(engine.score(2), Err(PqError::NotFound(_))));
}

#[test]
fn test_failing_fragment_aborts_the_search() {
    let fixture = Fixture::new();
    fixture.add_poses(&[1]);

    let mut engine = engine(&fixture);
    engine
        .search_seeds(10, &[literal_seed(&[(1, 0.9)], 1.0)])
        .unwrap();

    let broken = QuerySeed {
        sql: "WITH result AS (SELECT poseId, score FROM no_such_table)".to_string(),
        params: Vec::new(),
        ratio: 1.0,
    };
    let err = engine.search_seeds(10, &[broken]).unwrap_err();
    assert!(matches!(err, PqError::Execution { .. }));

    // The aborted search invalidated the score table.
    assert!(matches!(engine.score(1), Err(PqError::NotFound(_))));
}

#[test]
fn test_cancellation_between_criteria() {
    let fixture = Fixture::new();
    fixture.add_poses(&[1]);

    let token = CancelToken::new();
    token.cancel();

    let mut engine = engine(&fixture);
    let err = engine
        .search_seeds_with_cancel(10, &[literal_seed(&[(1, 0.9)], 1.0)], &token)
        .unwrap_err();
    assert!(matches!(err, PqError::Cancelled));
}

#[test]
fn test_negative_ratio_penalizes() {
    let fixture = Fixture::new();
    fixture.add_poses(&[1, 2]);

    let reward = literal_seed(&[(1, 1.0), (2, 1.0)], 1.0);
    let penalty = literal_seed(&[(1, 1.0)], -1.0);

    let mut engine = engine(&fixture);
    let ranked = engine.search_seeds(10, &[reward, penalty]).unwrap();
    assert_eq!(ranked, vec![2, 1]);
    assert!((engine.score(1).unwrap().total).abs() < 1e-9);
}
