//! Decay Model
//!
//! Words left unreviewed past their interval become more urgent. The boost is
//! logarithmic in the overdue factor (elapsed days / interval):
//!
//! effective = min(8.0, weight × (1 + ln(overdue)))   when overdue > 1
//!
//! so deeply overdue words rise without dominating moderately overdue ones.

use crate::types::{WordLearningRecord, MAX_WEIGHT, MIN_INTERVAL, MS_PER_DAY};

/// Days elapsed since the last review, None if never reviewed
///
/// Clock skew (a review stamped in the future) yields 0 rather than a
/// negative age.
pub fn days_since_review(record: &WordLearningRecord, now_ms: i64) -> Option<f64> {
    record
        .last_reviewed
        .map(|last| (now_ms.saturating_sub(last) as f64 / MS_PER_DAY).max(0.0))
}

/// Elapsed days relative to the expected interval, None if never reviewed
pub fn overdue_factor(record: &WordLearningRecord, now_ms: i64) -> Option<f64> {
    days_since_review(record, now_ms).map(|days| days / record.interval.max(MIN_INTERVAL))
}

/// Whether more days have passed than the record's interval
pub fn is_overdue(record: &WordLearningRecord, now_ms: i64) -> bool {
    days_since_review(record, now_ms).is_some_and(|days| days > record.interval)
}

/// Selection weight after the overdue correction
///
/// Never lower than the record's own weight.
pub fn effective_weight(record: &WordLearningRecord, now_ms: i64) -> f64 {
    match overdue_factor(record, now_ms) {
        Some(overdue) if overdue > 1.0 => {
            let boosted = (record.weight * (1.0 + overdue.ln())).min(MAX_WEIGHT);
            // A record already above the ceiling keeps its own weight.
            boosted.max(record.weight)
        }
        _ => record.weight,
    }
}
