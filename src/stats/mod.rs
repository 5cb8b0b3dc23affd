//! Learning Statistics
//!
//! Read-only aggregation over a learning store for reporting views.
//!
//! Classification (derived at read time, never stored):
//! - Mastered: weight ≤ 0.7 and streak ≥ 3
//! - Struggling: weight ≥ 4
//! - Learning: everything else (New when never reviewed)
//!
//! Every word lands in exactly one bucket; mastered wins if a custom
//! configuration makes the weight bands overlap.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::types::{LearningStore, WordLearningRecord};

// ==================== Types ====================

/// Aggregate counts over a store
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub total_words: usize,
    pub mastered: usize,
    pub learning: usize,
    pub struggling: usize,
    /// Rounded mean of the per-word response time averages (ms)
    pub avg_response_time: f64,
}

/// Derived learning state of one word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    New,
    Learning,
    Mastered,
    Struggling,
}

impl WordStatus {
    pub fn classify(record: &WordLearningRecord, config: &SchedulerConfig) -> Self {
        if is_mastered(record, config) {
            WordStatus::Mastered
        } else if is_struggling(record, config) {
            WordStatus::Struggling
        } else if record.review_count == 0 {
            WordStatus::New
        } else {
            WordStatus::Learning
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WordStatus::New => "new",
            WordStatus::Learning => "learning",
            WordStatus::Mastered => "mastered",
            WordStatus::Struggling => "struggling",
        }
    }
}

/// Exercise difficulty suited to a word's current mastery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Unknown words start easy
    pub fn for_record(record: Option<&WordLearningRecord>) -> Self {
        match record {
            Some(r) if r.correct_streak >= 5 && r.weight <= 0.7 => Difficulty::Hard,
            Some(r) if r.correct_streak >= 2 => Difficulty::Medium,
            _ => Difficulty::Easy,
        }
    }
}

/// Per-word row of the learning report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordDetail {
    pub word: String,
    pub weight: f64,
    pub interval: f64,
    pub review_count: u32,
    pub correct_streak: u32,
    pub avg_response_time: f64,
    pub last_reviewed: Option<i64>,
    pub status: WordStatus,
}

// ==================== Aggregation ====================

fn is_mastered(record: &WordLearningRecord, config: &SchedulerConfig) -> bool {
    record.weight <= config.mastered_max_weight && record.correct_streak >= config.mastered_min_streak
}

fn is_struggling(record: &WordLearningRecord, config: &SchedulerConfig) -> bool {
    record.weight >= config.struggling_min_weight
}

pub fn learning_stats(store: &LearningStore) -> LearningStats {
    learning_stats_with_config(store, &SchedulerConfig::default())
}

pub fn learning_stats_with_config(store: &LearningStore, config: &SchedulerConfig) -> LearningStats {
    let total_words = store.len();
    if total_words == 0 {
        return LearningStats::default();
    }

    let mut mastered = 0;
    let mut learning = 0;
    let mut struggling = 0;
    let mut response_time_sum = 0.0;
    for record in store.records() {
        match WordStatus::classify(record, config) {
            WordStatus::Mastered => mastered += 1,
            WordStatus::Struggling => struggling += 1,
            WordStatus::New | WordStatus::Learning => learning += 1,
        }
        response_time_sum += record.avg_response_time;
    }

    LearningStats {
        total_words,
        mastered,
        learning,
        struggling,
        avg_response_time: (response_time_sum / total_words as f64).round(),
    }
}

/// Report rows, most urgent (highest weight) first
pub fn word_details(store: &LearningStore, config: &SchedulerConfig) -> Vec<WordDetail> {
    let mut details: Vec<WordDetail> = store
        .records()
        .map(|record| WordDetail {
            word: record.word.clone(),
            weight: record.weight,
            interval: record.interval,
            review_count: record.review_count,
            correct_streak: record.correct_streak,
            avg_response_time: record.avg_response_time,
            last_reviewed: record.last_reviewed,
            status: WordStatus::classify(record, config),
        })
        .collect();

    details.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.word.cmp(&b.word))
    });
    details
}

/// Share of words mastered, as a rounded percentage
pub fn mastery_percent(stats: &LearningStats) -> u32 {
    if stats.total_words == 0 {
        return 0;
    }
    ((stats.mastered as f64 / stats.total_words as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(word: &str, weight: f64, streak: u32, avg: f64) -> WordLearningRecord {
        WordLearningRecord {
            weight,
            correct_streak: streak,
            review_count: streak.max(1),
            avg_response_time: avg,
            ..WordLearningRecord::new(word)
        }
    }

    fn sample_store() -> LearningStore {
        let mut store = LearningStore::new();
        store.insert(record("a", 0.5, 3, 1000.0));
        store.insert(record("b", 5.0, 0, 4001.0));
        store.insert(record("c", 2.0, 0, 2000.0));
        store
    }

    #[test]
    fn test_empty_store() {
        let stats = learning_stats(&LearningStore::new());
        assert_eq!(stats, LearningStats::default());
        assert_eq!(stats.avg_response_time, 0.0);
    }

    #[test]
    fn test_classification_counts() {
        let stats = learning_stats(&sample_store());
        assert_eq!(stats.total_words, 3);
        assert_eq!(stats.mastered, 1);
        assert_eq!(stats.struggling, 1);
        assert_eq!(stats.learning, 1);
        // (1000 + 4001 + 2000) / 3 = 2333.67
        assert_eq!(stats.avg_response_time, 2334.0);
    }

    #[test]
    fn test_low_weight_without_streak_is_learning() {
        let mut store = LearningStore::new();
        store.insert(record("x", 0.5, 2, 0.0));
        let stats = learning_stats(&store);
        assert_eq!(stats.mastered, 0);
        assert_eq!(stats.learning, 1);
    }

    #[test]
    fn test_threshold_edges() {
        let mut store = LearningStore::new();
        store.insert(record("m", 0.7, 3, 0.0));
        store.insert(record("s", 4.0, 0, 0.0));
        let stats = learning_stats(&store);
        assert_eq!(stats.mastered, 1);
        assert_eq!(stats.struggling, 1);
        assert_eq!(stats.learning, 0);
    }

    #[test]
    fn test_overlapping_bands_count_each_word_once() {
        let config = SchedulerConfig {
            mastered_max_weight: 6.0,
            ..Default::default()
        };
        let mut store = LearningStore::new();
        store.insert(record("both", 5.0, 3, 0.0));
        store.insert(record("hard", 7.0, 0, 0.0));

        let stats = learning_stats_with_config(&store, &config);
        assert_eq!(stats.mastered, 1);
        assert_eq!(stats.struggling, 1);
        assert_eq!(stats.learning, 0);

        let details = word_details(&store, &config);
        let both = details.iter().find(|d| d.word == "both").unwrap();
        assert_eq!(both.status, WordStatus::Mastered);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let value = serde_json::to_value(learning_stats(&sample_store())).unwrap();
        assert_eq!(value["totalWords"], 3);
        assert_eq!(value["avgResponseTime"], 2334.0);
    }

    #[test]
    fn test_word_status() {
        let config = SchedulerConfig::default();
        assert_eq!(
            WordStatus::classify(&WordLearningRecord::new("n"), &config),
            WordStatus::New
        );
        assert_eq!(
            WordStatus::classify(&record("l", 1.0, 1, 0.0), &config),
            WordStatus::Learning
        );
        assert_eq!(
            WordStatus::classify(&record("m", 0.5, 4, 0.0), &config),
            WordStatus::Mastered
        );
        let unseen_hard = WordLearningRecord {
            weight: 6.0,
            ..WordLearningRecord::new("h")
        };
        assert_eq!(WordStatus::classify(&unseen_hard, &config), WordStatus::Struggling);
        assert_eq!(WordStatus::Struggling.as_str(), "struggling");
    }

    #[test]
    fn test_word_details_sorted_by_weight() {
        let details = word_details(&sample_store(), &SchedulerConfig::default());
        let order: Vec<&str> = details.iter().map(|d| d.word.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
        assert_eq!(details[0].status, WordStatus::Struggling);
        assert_eq!(details[2].status, WordStatus::Mastered);
    }

    #[test]
    fn test_word_details_ties_by_word() {
        let mut store = LearningStore::new();
        store.insert(record("zeta", 1.0, 1, 0.0));
        store.insert(record("alpha", 1.0, 1, 0.0));
        let details = word_details(&store, &SchedulerConfig::default());
        assert_eq!(details[0].word, "alpha");
    }

    #[test]
    fn test_adaptive_difficulty() {
        assert_eq!(Difficulty::for_record(None), Difficulty::Easy);
        assert_eq!(
            Difficulty::for_record(Some(&record("a", 1.0, 1, 0.0))),
            Difficulty::Easy
        );
        assert_eq!(
            Difficulty::for_record(Some(&record("a", 1.0, 2, 0.0))),
            Difficulty::Medium
        );
        assert_eq!(
            Difficulty::for_record(Some(&record("a", 0.5, 5, 0.0))),
            Difficulty::Hard
        );
        // Long streak but weight still high
        assert_eq!(
            Difficulty::for_record(Some(&record("a", 1.0, 6, 0.0))),
            Difficulty::Medium
        );
    }

    #[test]
    fn test_mastery_percent() {
        assert_eq!(mastery_percent(&learning_stats(&sample_store())), 33);
        assert_eq!(mastery_percent(&LearningStats::default()), 0);
    }
}
