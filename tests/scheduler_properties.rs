//! Property-Based Tests for the Review Scheduler
//!
//! Tests the following invariants:
//! - Bounds: weight, interval and ease factor stay in range after any answer
//! - Counters: review count +1 per answer, streak reset on a miss
//! - Decay: effective weight never drops below the stored weight
//! - Selection: no duplicates, exactly min(count, pool) items
//! - Migration: idempotent
//! - Stats: mastered + learning + struggling == total

use std::collections::HashSet;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use danci_scheduler::sanitize::is_record_within_bounds;
use danci_scheduler::{
    effective_weight, learning_stats, migrate_legacy, select_for_review, update_record,
    LearningStore, WordLearningRecord, MAX_WEIGHT, MIN_WEIGHT,
};

const NOW: i64 = 1_700_000_000_000;
const DAY: i64 = 86_400_000;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_record() -> impl Strategy<Value = WordLearningRecord> {
    (
        "[a-z]{1,8}",
        (0.5f64..=8.0f64),                        // weight
        (1.0f64..=365.0f64),                      // interval
        (1.3f64..=2.5f64),                        // ease factor
        proptest::option::of(0i64..=400 * DAY),   // age of last review
        (0u32..=500u32),                          // review count
        (0u32..=50u32),                           // streak
        (0.0f64..=60_000.0f64),                   // avg response time
    )
        .prop_map(
            |(word, weight, interval, ease_factor, age, review_count, correct_streak, avg)| {
                WordLearningRecord {
                    word,
                    weight,
                    interval,
                    ease_factor,
                    last_reviewed: age.map(|a| NOW - a),
                    review_count,
                    correct_streak,
                    avg_response_time: avg,
                }
            },
        )
}

fn arb_response_time() -> impl Strategy<Value = f64> {
    prop_oneof![
        (0.0f64..=20_000.0f64),
        Just(-1.0),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(1e15),
    ]
}

fn arb_store() -> impl Strategy<Value = LearningStore> {
    proptest::collection::vec(arb_record(), 0..30).prop_map(|records| {
        let mut store = LearningStore::new();
        for record in records {
            store.insert(record);
        }
        store
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_update_keeps_bounds(
        record in arb_record(),
        answers in proptest::collection::vec((any::<bool>(), arb_response_time()), 1..20),
    ) {
        let mut current = record;
        for (i, (is_correct, rt)) in answers.into_iter().enumerate() {
            let before = current.review_count;
            current = update_record(&current, is_correct, rt, NOW + i as i64);
            prop_assert!(is_record_within_bounds(&current), "out of bounds: {:?}", current);
            prop_assert_eq!(current.review_count, before + 1);
        }
    }

    #[test]
    fn prop_quick_correct_decreases_weight(record in arb_record(), rt in 0.0f64..2999.0) {
        let updated = update_record(&record, true, rt, NOW);
        if record.weight > MIN_WEIGHT {
            prop_assert!(updated.weight < record.weight);
        } else {
            prop_assert_eq!(updated.weight, MIN_WEIGHT);
        }
        prop_assert_eq!(updated.correct_streak, record.correct_streak + 1);
    }

    #[test]
    fn prop_miss_resets_streak_and_doubles_weight(record in arb_record(), rt in arb_response_time()) {
        let updated = update_record(&record, false, rt, NOW);
        prop_assert_eq!(updated.correct_streak, 0);
        prop_assert_eq!(updated.interval, 1.0);
        let expected = (record.weight * 2.0).min(MAX_WEIGHT);
        prop_assert!((updated.weight - expected).abs() < 1e-12);
    }

    #[test]
    fn prop_effective_weight_not_below_weight(record in arb_record(), offset in 0i64..=1000 * DAY) {
        prop_assert!(effective_weight(&record, NOW + offset) >= record.weight);
    }

    #[test]
    fn prop_selection_size_and_uniqueness(
        store in arb_store(),
        pool in proptest::collection::vec("[a-z]{1,6}", 0..40),
        count in 0usize..50,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let selected = select_for_review(&pool, &store, count, NOW, &mut rng);

        let distinct: HashSet<&str> = pool.iter().map(|w| w.as_str()).collect();
        prop_assert_eq!(selected.len(), count.min(distinct.len()));

        let picked: HashSet<&str> = selected.iter().map(|w| w.as_str()).collect();
        prop_assert_eq!(picked.len(), selected.len());
        prop_assert!(picked.is_subset(&distinct));
    }

    #[test]
    fn prop_migration_idempotent(
        legacy in proptest::collection::hash_map("[a-z]{1,8}", 0.0f64..20.0, 0..20),
    ) {
        prop_assume!(!legacy.contains_key("version"));
        let value = serde_json::to_value(&legacy).unwrap();
        let once = migrate_legacy(&value);
        let twice = migrate_legacy(&once.to_value());
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.len(), legacy.len());
    }

    #[test]
    fn prop_stats_partition_total(store in arb_store()) {
        let stats = learning_stats(&store);
        prop_assert_eq!(stats.total_words, store.len());
        prop_assert_eq!(stats.mastered + stats.learning + stats.struggling, stats.total_words);
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_session_round_trip() {
    let mut store = migrate_legacy(&serde_json::json!({"dog": 3, "cat": 0.6}));
    let words: Vec<String> = ["dog", "cat", "bird", "fish"]
        .iter()
        .map(|w| w.to_string())
        .collect();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let config = danci_scheduler::SchedulerConfig::default();

    let session: Vec<String> = select_for_review(&words, &store, 3, NOW, &mut rng)
        .into_iter()
        .cloned()
        .collect();
    assert_eq!(session.len(), 3);

    for (i, word) in session.iter().enumerate() {
        store.record_answer(word, i % 2 == 0, 1500.0, NOW + i as i64, &config);
    }

    for word in &session {
        let record = store.get(word).expect("answered word is stored");
        assert_eq!(record.review_count, 1);
        assert!(record.last_reviewed.is_some());
    }

    let stats = learning_stats(&store);
    assert_eq!(
        stats.mastered + stats.learning + stats.struggling,
        stats.total_words
    );
}

#[test]
fn scenario_stats_example() {
    let store: LearningStore = serde_json::from_value(serde_json::json!({
        "version": 1,
        "a": {"weight": 0.5, "correctStreak": 3},
        "b": {"weight": 5},
        "c": {"weight": 2, "correctStreak": 0}
    }))
    .unwrap();

    let stats = learning_stats(&store);
    assert_eq!(stats.total_words, 3);
    assert_eq!(stats.mastered, 1);
    assert_eq!(stats.struggling, 1);
    assert_eq!(stats.learning, 1);
}
