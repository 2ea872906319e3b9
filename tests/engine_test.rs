//! Tests for end-to-end submission handling.

use counting_game::invariants::{AcceptedSubmission, CountingInvariants, InvariantSet};
use counting_game::{
    GameConfig, GameEngine, GameRepository, GameStore, InboundMessage, LifecycleManager,
    SubmissionOutcome, Violation,
};
use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

/// Creates a temporary database with schema applied plus an engine and
/// lifecycle manager sharing one store. The file handle must stay in scope
/// to keep the database alive.
fn setup() -> (NamedTempFile, GameEngine, LifecycleManager) {
    setup_with_config(GameConfig::default())
}

fn setup_with_config(config: GameConfig) -> (NamedTempFile, GameEngine, LifecycleManager) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(&db_path);
    repo.apply_migrations().expect("Migrations failed");

    let store = GameStore::new();
    let engine = GameEngine::new(store.clone(), repo.clone(), config);
    let lifecycle = LifecycleManager::new(store, repo);
    (db_file, engine, lifecycle)
}

fn msg(channel: &str, author: &str, message_id: &str, text: &str) -> InboundMessage {
    InboundMessage::new(
        channel.to_string(),
        author.to_string(),
        message_id.to_string(),
        text.to_string(),
    )
}

#[test]
fn test_scenario_walkthrough() {
    let (_db, engine, lifecycle) = setup();
    lifecycle.start("lobby").expect("Start failed");

    let outcome = engine.submit(&msg("lobby", "alice", "m1", "1")).unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Success {
            count: 1,
            milestone: false
        }
    );

    let outcome = engine.submit(&msg("lobby", "bob", "m2", "2")).unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Success {
            count: 2,
            milestone: false
        }
    );

    // Wrong number: count is 2, expected 3.
    let outcome = engine.submit(&msg("lobby", "alice", "m3", "2")).unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Rejected(Violation::WrongNumber {
            expected: 3,
            got: 2
        })
    );

    let outcome = engine.submit(&msg("lobby", "bob", "m4", "3")).unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Success {
            count: 3,
            milestone: false
        }
    );

    // Correct number, but bob just counted.
    let outcome = engine.submit(&msg("lobby", "bob", "m5", "4")).unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Rejected(Violation::DoubleCounting {
            author_id: "bob".to_string()
        })
    );

    let final_count = lifecycle.stop("lobby").expect("Stop failed");
    assert_eq!(final_count, 3);
}

#[test]
fn test_rejection_leaves_state_unchanged() {
    let (_db, engine, lifecycle) = setup();
    lifecycle.start("lobby").expect("Start failed");

    engine.submit(&msg("lobby", "alice", "m1", "1")).unwrap();
    engine.submit(&msg("lobby", "alice", "m2", "7")).unwrap();
    engine.submit(&msg("lobby", "alice", "m3", "2")).unwrap();

    // Both rejections left count and last author untouched: bob can still
    // submit 2.
    assert_eq!(engine.score("lobby"), Some(1));
    let outcome = engine.submit(&msg("lobby", "bob", "m4", "2")).unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Success {
            count: 2,
            milestone: false
        }
    );
}

#[test]
fn test_non_claims_are_ignored_without_side_effects() {
    let (_db, engine, lifecycle) = setup();
    lifecycle.start("lobby").expect("Start failed");
    engine.submit(&msg("lobby", "alice", "m1", "1")).unwrap();

    for text in ["hello", "2!", "two", "", "  ", "-2", "2 3"] {
        let outcome = engine.submit(&msg("lobby", "bob", "mx", text)).unwrap();
        assert_eq!(outcome, SubmissionOutcome::Ignored, "text: {:?}", text);
    }

    assert_eq!(engine.score("lobby"), Some(1));
}

#[test]
fn test_claim_with_surrounding_whitespace_participates() {
    let (_db, engine, lifecycle) = setup();
    lifecycle.start("lobby").expect("Start failed");

    let outcome = engine.submit(&msg("lobby", "alice", "m1", "  1 \n")).unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Success {
            count: 1,
            milestone: false
        }
    );
}

#[test]
fn test_submission_without_game_is_ignored() {
    let (_db, engine, _lifecycle) = setup();

    let outcome = engine.submit(&msg("lobby", "alice", "m1", "1")).unwrap();
    assert_eq!(outcome, SubmissionOutcome::Ignored);
    assert_eq!(engine.score("lobby"), None);
}

#[test]
fn test_submission_after_stop_is_ignored() {
    let (_db, engine, lifecycle) = setup();
    lifecycle.start("lobby").expect("Start failed");
    engine.submit(&msg("lobby", "alice", "m1", "1")).unwrap();
    lifecycle.stop("lobby").expect("Stop failed");

    let outcome = engine.submit(&msg("lobby", "bob", "m2", "2")).unwrap();
    assert_eq!(outcome, SubmissionOutcome::Ignored);
    assert_eq!(engine.score("lobby"), None);
}

#[test]
fn test_milestone_on_configured_interval() {
    let config = GameConfig::new(2, 3, String::new());
    let (_db, engine, lifecycle) = setup_with_config(config);
    lifecycle.start("lobby").expect("Start failed");

    let authors = ["alice", "bob"];
    for n in 1..=4u64 {
        let author = authors[(n % 2) as usize];
        let outcome = engine
            .submit(&msg("lobby", author, "mx", &n.to_string()))
            .unwrap();
        let expected_milestone = n % 2 == 0;
        assert_eq!(
            outcome,
            SubmissionOutcome::Success {
                count: n,
                milestone: expected_milestone
            }
        );
    }
}

#[test]
fn test_zero_interval_never_announces() {
    let config = GameConfig::new(0, 3, String::new());
    let (_db, engine, lifecycle) = setup_with_config(config);
    lifecycle.start("lobby").expect("Start failed");

    let authors = ["alice", "bob"];
    for n in 1..=6u64 {
        let author = authors[(n % 2) as usize];
        let outcome = engine
            .submit(&msg("lobby", author, "mx", &n.to_string()))
            .unwrap();
        assert_eq!(
            outcome,
            SubmissionOutcome::Success {
                count: n,
                milestone: false
            }
        );
    }
}

#[test]
fn test_accepted_sequence_upholds_invariants() {
    let (_db, engine, lifecycle) = setup();
    lifecycle.start("lobby").expect("Start failed");

    let authors = ["alice", "bob", "carol"];
    let mut log = Vec::new();

    for n in 1..=10u64 {
        let author = authors[(n as usize) % authors.len()];
        let outcome = engine
            .submit(&msg("lobby", author, "mx", &n.to_string()))
            .unwrap();
        if let SubmissionOutcome::Success { count, .. } = outcome {
            log.push(AcceptedSubmission::new(count, author));
        } else {
            panic!("Submission {} should succeed, got {:?}", n, outcome);
        }
    }

    assert!(CountingInvariants::check_all(log.as_slice()).is_ok());
    assert_eq!(engine.score("lobby"), Some(10));
}

#[test]
fn test_race_on_same_number_accepts_exactly_one() {
    let (_db, engine, lifecycle) = setup();
    lifecycle.start("lobby").expect("Start failed");

    let engine_a = engine.clone();
    let engine_b = engine.clone();

    let handle_a =
        std::thread::spawn(move || engine_a.submit(&msg("lobby", "alice", "m1", "1")).unwrap());
    let handle_b =
        std::thread::spawn(move || engine_b.submit(&msg("lobby", "bob", "m2", "1")).unwrap());

    let outcomes = [handle_a.join().unwrap(), handle_b.join().unwrap()];

    let successes = outcomes
        .iter()
        .filter(|o| {
            matches!(
                o,
                SubmissionOutcome::Success {
                    count: 1,
                    milestone: false
                }
            )
        })
        .count();
    let rejections = outcomes
        .iter()
        .filter(|o| {
            matches!(
                o,
                SubmissionOutcome::Rejected(Violation::WrongNumber {
                    expected: 2,
                    got: 1
                })
            )
        })
        .count();

    assert_eq!(successes, 1, "Exactly one submission may claim the count");
    assert_eq!(rejections, 1, "The loser sees the already-advanced count");
    assert_eq!(engine.score("lobby"), Some(1));
}

#[test]
fn test_channels_are_independent() {
    let (_db, engine, lifecycle) = setup();
    lifecycle.start("alpha").expect("Start failed");
    lifecycle.start("beta").expect("Start failed");

    // The same author may count back-to-back across different channels.
    engine.submit(&msg("alpha", "alice", "m1", "1")).unwrap();
    let outcome = engine.submit(&msg("beta", "alice", "m2", "1")).unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Success {
            count: 1,
            milestone: false
        }
    );

    engine.submit(&msg("alpha", "bob", "m3", "2")).unwrap();
    assert_eq!(engine.score("alpha"), Some(2));
    assert_eq!(engine.score("beta"), Some(1));
}

#[test]
fn test_persistence_failure_surfaces_and_preserves_count() {
    let (db_file, engine, lifecycle) = setup();
    lifecycle.start("lobby").expect("Start failed");
    engine.submit(&msg("lobby", "alice", "m1", "1")).unwrap();

    // Destroy the backing database out from under the repository; the next
    // durable write cannot be confirmed.
    std::fs::remove_file(db_file.path()).expect("Failed to remove db file");

    let result = engine.submit(&msg("lobby", "bob", "m2", "2"));
    assert!(result.is_err(), "Lost database must surface as an error");

    // The in-memory count did not advance past the unconfirmed write.
    assert_eq!(engine.score("lobby"), Some(1));
}

#[test]
fn test_restart_resumes_count_and_last_author() {
    let (_db, engine, lifecycle) = setup();
    lifecycle.start("lobby").expect("Start failed");
    engine.submit(&msg("lobby", "alice", "m1", "1")).unwrap();
    engine.submit(&msg("lobby", "bob", "m2", "2")).unwrap();
    engine.submit(&msg("lobby", "alice", "m3", "3")).unwrap();

    // Simulate a process restart: hydrate a fresh store from the same
    // database.
    let repo = GameRepository::new(
        _db.path().to_str().expect("Invalid path"),
    );
    let store = GameStore::hydrate(&repo).expect("Hydration failed");
    let revived = GameEngine::new(store, repo, GameConfig::default());

    assert_eq!(revived.score("lobby"), Some(3));

    // The last author survived the restart: alice still cannot count twice.
    let outcome = revived.submit(&msg("lobby", "alice", "m4", "4")).unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Rejected(Violation::DoubleCounting {
            author_id: "alice".to_string()
        })
    );

    let outcome = revived.submit(&msg("lobby", "bob", "m5", "4")).unwrap();
    assert_eq!(
        outcome,
        SubmissionOutcome::Success {
            count: 4,
            milestone: false
        }
    );
}
