//! Data Sanitization
//!
//! Numerical stability utilities.
//!
//! Functions:
//! - Bounded field clamping (weight, interval, ease factor)
//! - Response time hardening
//! - Record repair on every write path

use crate::types::{
    WordLearningRecord, MAX_EASE_FACTOR, MAX_INTERVAL, MAX_WEIGHT, MIN_EASE_FACTOR, MIN_INTERVAL,
    MIN_WEIGHT,
};

/// 检查数组是否包含无效值 (NaN 或 Inf)
pub fn has_invalid_values(arr: &[f64]) -> bool {
    arr.iter().any(|&x| x.is_nan() || x.is_infinite())
}

/// 将值限制在区间内，无效值回退到 fallback
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// 限制权重到 [0.5, 8.0]
pub fn clamp_weight(weight: f64) -> f64 {
    clamp_or(weight, MIN_WEIGHT, MAX_WEIGHT, 1.0)
}

/// 限制复习间隔到 [1, 365] 天
pub fn clamp_interval(interval: f64) -> f64 {
    clamp_or(interval, MIN_INTERVAL, MAX_INTERVAL, MIN_INTERVAL)
}

/// 限制难度系数到 [1.3, 2.5]
pub fn clamp_ease_factor(ease_factor: f64) -> f64 {
    clamp_or(ease_factor, MIN_EASE_FACTOR, MAX_EASE_FACTOR, MAX_EASE_FACTOR)
}

/// 清理响应时间: 负数与 NaN 归零，超出上限截断
///
/// Returns the sanitized value and whether it had to change.
pub fn sanitize_response_time(response_time_ms: f64, max_ms: f64) -> (f64, bool) {
    if response_time_ms.is_nan() || response_time_ms < 0.0 {
        return (0.0, true);
    }
    if response_time_ms > max_ms {
        return (max_ms, true);
    }
    (response_time_ms, false)
}

/// 修复记录中的越界字段
pub fn sanitize_record(record: WordLearningRecord) -> WordLearningRecord {
    let avg_response_time = if record.avg_response_time.is_finite() {
        record.avg_response_time.max(0.0)
    } else {
        0.0
    };

    WordLearningRecord {
        weight: clamp_weight(record.weight),
        interval: clamp_interval(record.interval),
        ease_factor: clamp_ease_factor(record.ease_factor),
        avg_response_time,
        ..record
    }
}

/// 判断记录是否所有字段都在合法范围内
pub fn is_record_within_bounds(record: &WordLearningRecord) -> bool {
    !has_invalid_values(&[
        record.weight,
        record.interval,
        record.ease_factor,
        record.avg_response_time,
    ]) && (MIN_WEIGHT..=MAX_WEIGHT).contains(&record.weight)
        && (MIN_INTERVAL..=MAX_INTERVAL).contains(&record.interval)
        && (MIN_EASE_FACTOR..=MAX_EASE_FACTOR).contains(&record.ease_factor)
        && record.avg_response_time >= 0.0
}
