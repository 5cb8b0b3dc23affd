//! Record Factory and Update Policy
//!
//! A word's learning record evolves one answer at a time:
//! - Quick correct answers (< 3s) shrink weight fastest and grow the interval by 2.5x
//! - Slow correct answers shrink weight moderately and grow the interval by 1.5x
//! - Three or more consecutive correct answers add a streak bonus
//! - A wrong answer doubles weight, resets the interval and the streak
//!
//! Updates are pure: the input record is never mutated, a new value is returned.

use crate::config::SchedulerConfig;
use crate::sanitize::{
    clamp_ease_factor, clamp_interval, clamp_weight, sanitize_record, sanitize_response_time,
};
use crate::types::{LearningStore, WordLearningRecord, MIN_INTERVAL};

// ==================== Constants ====================

/// Extra response time per unit of hesitation (backspaces / keystrokes)
const HESITATION_PENALTY: f64 = 0.5;

/// Response time multiplier for an answer given on a retry attempt
const RETRY_PENALTY: f64 = 1.5;

// ==================== Record Factory ====================

/// Default learning state for a word with no history
pub fn create_default(word: &str) -> WordLearningRecord {
    WordLearningRecord::new(word)
}

// ==================== Update Policy ====================

/// Apply one answer with the default configuration
pub fn update_record(
    record: &WordLearningRecord,
    is_correct: bool,
    response_time_ms: f64,
    now_ms: i64,
) -> WordLearningRecord {
    update_record_with_config(
        record,
        is_correct,
        response_time_ms,
        now_ms,
        &SchedulerConfig::default(),
    )
}

/// Apply one answer and return the next record
pub fn update_record_with_config(
    record: &WordLearningRecord,
    is_correct: bool,
    response_time_ms: f64,
    now_ms: i64,
    config: &SchedulerConfig,
) -> WordLearningRecord {
    let (response_time, clamped) =
        sanitize_response_time(response_time_ms, config.max_response_time_ms);
    if clamped {
        tracing::warn!(
            word = %record.word,
            response_time_ms,
            sanitized = response_time,
            "Response time out of range, clamped"
        );
    }

    // Stored data may predate the bounds; start from a repaired copy.
    let base = sanitize_record(record.clone());

    let next = if is_correct {
        let correct_streak = base.correct_streak.saturating_add(1);
        let (mut weight, interval, ease_factor) = if response_time < config.quick_threshold_ms {
            (
                clamp_weight(base.weight * config.quick_weight_factor),
                clamp_interval(base.interval * config.quick_interval_factor),
                clamp_ease_factor(base.ease_factor + config.ease_step_up),
            )
        } else {
            (
                clamp_weight(base.weight * config.slow_weight_factor),
                clamp_interval(base.interval * config.slow_interval_factor),
                base.ease_factor,
            )
        };

        if correct_streak >= config.streak_bonus_threshold {
            weight = clamp_weight(weight * config.streak_bonus_factor);
        }

        WordLearningRecord {
            weight,
            interval,
            ease_factor,
            correct_streak,
            ..base
        }
    } else {
        WordLearningRecord {
            weight: clamp_weight(base.weight * config.miss_weight_factor),
            interval: MIN_INTERVAL,
            ease_factor: clamp_ease_factor(base.ease_factor - config.ease_step_down),
            correct_streak: 0,
            ..base
        }
    };

    let avg_response_time = if next.avg_response_time == 0.0 {
        response_time
    } else {
        let history = config.response_time_history_weight;
        (next.avg_response_time * history + response_time * (1.0 - history)).round()
    };

    let updated = WordLearningRecord {
        last_reviewed: Some(now_ms),
        review_count: next.review_count.saturating_add(1),
        avg_response_time,
        ..next
    };

    tracing::debug!(
        word = %updated.word,
        is_correct,
        weight = updated.weight,
        interval = updated.interval,
        streak = updated.correct_streak,
        "Word learning record updated"
    );

    updated
}

/// Response time adjusted for hesitation and retries
///
/// Typing-style answers report backspace usage; each backspace per keystroke
/// adds half of the raw time, and a retry attempt counts 1.5x on top.
pub fn adjusted_response_time(
    response_time_ms: f64,
    keystrokes: u32,
    backspaces: u32,
    is_retry: bool,
) -> f64 {
    let hesitation = if keystrokes > 0 {
        backspaces as f64 / keystrokes as f64
    } else {
        0.0
    };
    let adjusted = response_time_ms * (1.0 + hesitation * HESITATION_PENALTY);
    if is_retry {
        adjusted * RETRY_PENALTY
    } else {
        adjusted
    }
}

impl LearningStore {
    /// Score one answer for `word` and persist the new record in the store
    ///
    /// Unknown words start from the default record. Returns None, leaving the
    /// store untouched, when `word` is the reserved version key.
    pub fn record_answer(
        &mut self,
        word: &str,
        is_correct: bool,
        response_time_ms: f64,
        now_ms: i64,
        config: &SchedulerConfig,
    ) -> Option<WordLearningRecord> {
        if LearningStore::is_reserved_word(word) {
            tracing::warn!(word, "Answer for a reserved word not recorded");
            return None;
        }
        let current = self.record_or_default(word);
        let updated =
            update_record_with_config(&current, is_correct, response_time_ms, now_ms, config);
        self.insert(updated.clone());
        Some(updated)
    }
}
