//! Scheduler Configuration
//!
//! Tunable multipliers and thresholds for the update policy, the selector,
//! and the stats classification. Field bounds (weight, interval, ease factor
//! ranges) are fixed constants in [`crate::types`] and are not configurable.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Scheduler tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Answers faster than this (ms) count as quick
    pub quick_threshold_ms: f64,
    /// Weight multiplier on a quick correct answer
    pub quick_weight_factor: f64,
    /// Interval multiplier on a quick correct answer
    pub quick_interval_factor: f64,
    /// Ease factor increment on a quick correct answer
    pub ease_step_up: f64,
    /// Weight multiplier on a slow correct answer
    pub slow_weight_factor: f64,
    /// Interval multiplier on a slow correct answer
    pub slow_interval_factor: f64,
    /// Streak length that triggers the bonus
    pub streak_bonus_threshold: u32,
    /// Extra weight multiplier once the streak bonus applies
    pub streak_bonus_factor: f64,
    /// Weight multiplier on a wrong answer
    pub miss_weight_factor: f64,
    /// Ease factor decrement on a wrong answer
    pub ease_step_down: f64,
    /// Share of the previous average kept in the response time average
    pub response_time_history_weight: f64,
    /// Upper clamp for a single response time sample (ms)
    pub max_response_time_ms: f64,
    /// Priority multiplier for never-reviewed words
    pub new_item_boost: f64,
    /// Priority multiplier for words past their interval
    pub overdue_boost: f64,
    /// Words at or below this weight may count as mastered
    pub mastered_max_weight: f64,
    /// Minimum streak for a word to count as mastered
    pub mastered_min_streak: u32,
    /// Words at or above this weight count as struggling
    pub struggling_min_weight: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            quick_threshold_ms: 3000.0,
            quick_weight_factor: 0.6,
            quick_interval_factor: 2.5,
            ease_step_up: 0.1,
            slow_weight_factor: 0.8,
            slow_interval_factor: 1.5,
            streak_bonus_threshold: 3,
            streak_bonus_factor: 0.9,
            miss_weight_factor: 2.0,
            ease_step_down: 0.2,
            response_time_history_weight: 0.7,
            max_response_time_ms: 600_000.0,
            new_item_boost: 1.5,
            overdue_boost: 2.0,
            mastered_max_weight: 0.7,
            mastered_min_streak: 3,
            struggling_min_weight: 4.0,
        }
    }
}

impl SchedulerConfig {
    /// Parse a JSON config; absent fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("quickThresholdMs", self.quick_threshold_ms),
            ("maxResponseTimeMs", self.max_response_time_ms),
            ("newItemBoost", self.new_item_boost),
            ("overdueBoost", self.overdue_boost),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(format!("{name} must be a positive number, got {value}")));
            }
        }

        // Correct answers must never raise weight, misses must never lower it.
        let shrinking = [
            ("quickWeightFactor", self.quick_weight_factor),
            ("slowWeightFactor", self.slow_weight_factor),
            ("streakBonusFactor", self.streak_bonus_factor),
        ];
        for (name, value) in shrinking {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(invalid(format!("{name} must be in (0, 1], got {value}")));
            }
        }

        let growing = [
            ("quickIntervalFactor", self.quick_interval_factor),
            ("slowIntervalFactor", self.slow_interval_factor),
            ("missWeightFactor", self.miss_weight_factor),
        ];
        for (name, value) in growing {
            if !value.is_finite() || value < 1.0 {
                return Err(invalid(format!("{name} must be at least 1, got {value}")));
            }
        }

        let steps = [
            ("easeStepUp", self.ease_step_up),
            ("easeStepDown", self.ease_step_down),
        ];
        for (name, value) in steps {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("{name} must be non-negative, got {value}")));
            }
        }

        let history = self.response_time_history_weight;
        if !history.is_finite() || !(0.0..=1.0).contains(&history) {
            return Err(invalid(format!(
                "responseTimeHistoryWeight must be in [0, 1], got {history}"
            )));
        }

        if !self.mastered_max_weight.is_finite()
            || !self.struggling_min_weight.is_finite()
            || self.mastered_max_weight >= self.struggling_min_weight
        {
            return Err(invalid(format!(
                "masteredMaxWeight ({}) must be below strugglingMinWeight ({})",
                self.mastered_max_weight, self.struggling_min_weight
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> SchedulerError {
    SchedulerError::InvalidConfig(message)
}
