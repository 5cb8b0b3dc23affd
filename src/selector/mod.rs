//! Review Selector
//!
//! Picks the words for the next session by weighted random sampling without
//! replacement.
//!
//! Priority per candidate:
//! - Start from the decay-corrected effective weight
//! - Never reviewed: × 1.5
//! - Past its interval: × 2 (on top of the logarithmic decay boost)
//!
//! Each draw takes a uniform value in [0, total) and walks the remaining
//! candidates until the running sum exceeds it. A pool whose priorities are
//! all zero falls back to a uniform draw.

use std::collections::HashSet;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::config::SchedulerConfig;
use crate::decay::{effective_weight, is_overdue};
use crate::error::Result;
use crate::stats::{learning_stats_with_config, LearningStats};
use crate::types::{LearningStore, ReviewCandidate, WordLearningRecord};

// ==================== Data Structures ====================

/// Candidate with its resolved record and sampling priority
#[derive(Clone, Debug)]
pub struct ScoredCandidate<'a, T> {
    pub item: &'a T,
    /// Stored record, or a default one for words never seen
    pub record: WordLearningRecord,
    pub priority: f64,
}

// ==================== Scoring ====================

/// Sampling priority of a record at `now_ms`
pub fn priority_score(record: &WordLearningRecord, now_ms: i64, config: &SchedulerConfig) -> f64 {
    let mut priority = effective_weight(record, now_ms);

    if record.review_count == 0 {
        priority *= config.new_item_boost;
    }

    if is_overdue(record, now_ms) {
        priority *= config.overdue_boost;
    }

    priority
}

/// Resolve and score every distinct candidate word
///
/// Later candidates repeating an earlier word are dropped so a session never
/// asks the same word twice.
pub fn score_candidates<'a, T: ReviewCandidate>(
    candidates: &'a [T],
    store: &LearningStore,
    now_ms: i64,
    config: &SchedulerConfig,
) -> Vec<ScoredCandidate<'a, T>> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .iter()
        .filter(|item| seen.insert(item.word()))
        .map(|item| {
            let record = store.record_or_default(item.word());
            let priority = priority_score(&record, now_ms, config);
            ScoredCandidate {
                item,
                record,
                priority,
            }
        })
        .collect()
}

// ==================== Sampling ====================

/// Draw up to `count` distinct indices, each with probability proportional
/// to its priority among those still remaining
///
/// Negative or non-finite priorities are treated as zero.
pub fn weighted_sample<R: Rng + ?Sized>(priorities: &[f64], count: usize, rng: &mut R) -> Vec<usize> {
    let mut remaining: Vec<(usize, f64)> = priorities
        .iter()
        .enumerate()
        .map(|(index, &p)| (index, if p.is_finite() && p > 0.0 { p } else { 0.0 }))
        .collect();

    let target = count.min(remaining.len());
    let mut selected = Vec::with_capacity(target);
    let mut warned = false;

    while selected.len() < target {
        let total: f64 = remaining.iter().map(|(_, p)| p).sum();

        let pick = if total > 0.0 && total.is_finite() {
            let draw = rng.gen::<f64>() * total;
            let mut running = 0.0;
            remaining
                .iter()
                .position(|(_, p)| {
                    running += p;
                    running > draw
                })
                // Rounding can leave the draw just past the final sum.
                .or_else(|| remaining.iter().rposition(|(_, p)| *p > 0.0))
                .unwrap_or(0)
        } else {
            if !warned {
                tracing::warn!(
                    remaining = remaining.len(),
                    "All remaining priorities are zero, sampling uniformly"
                );
                warned = true;
            }
            rng.gen_range(0..remaining.len())
        };

        let (index, _) = remaining.remove(pick);
        selected.push(index);
    }

    selected
}

// ==================== Selection ====================

/// Select up to `count` words for review with the default configuration
pub fn select_for_review<'a, T, R>(
    candidates: &'a [T],
    store: &LearningStore,
    count: usize,
    now_ms: i64,
    rng: &mut R,
) -> Vec<&'a T>
where
    T: ReviewCandidate,
    R: Rng + ?Sized,
{
    select_for_review_with_config(
        candidates,
        store,
        count,
        now_ms,
        rng,
        &SchedulerConfig::default(),
    )
}

/// Select up to `count` words for review
///
/// Returns `min(count, distinct candidate words)` items in draw order.
pub fn select_for_review_with_config<'a, T, R>(
    candidates: &'a [T],
    store: &LearningStore,
    count: usize,
    now_ms: i64,
    rng: &mut R,
    config: &SchedulerConfig,
) -> Vec<&'a T>
where
    T: ReviewCandidate,
    R: Rng + ?Sized,
{
    let scored = score_candidates(candidates, store, now_ms, config);
    let priorities: Vec<f64> = scored.iter().map(|c| c.priority).collect();
    let picked = weighted_sample(&priorities, count, rng);

    tracing::debug!(
        candidates = candidates.len(),
        distinct = scored.len(),
        requested = count,
        selected = picked.len(),
        "Selected words for review"
    );

    picked.into_iter().map(|index| scored[index].item).collect()
}

// ==================== Scheduler ====================

/// Review scheduler with its own seedable random source
///
/// Bundles a validated configuration with a `ChaCha8Rng` so hosts get
/// reproducible sessions by fixing the seed.
#[derive(Clone, Debug)]
pub struct ReviewScheduler {
    config: SchedulerConfig,
    rng: ChaCha8Rng,
}

impl ReviewScheduler {
    /// Default configuration, seeded from the system clock
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
            rng: ChaCha8Rng::seed_from_u64(clock_seed()),
        }
    }

    /// Custom configuration; `seed` of None uses the system clock
    pub fn with_config(config: SchedulerConfig, seed: Option<u64>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed.unwrap_or_else(clock_seed)),
        })
    }

    /// Default configuration with a fixed seed (for testing)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            config: SchedulerConfig::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn select_for_review<'a, T: ReviewCandidate>(
        &mut self,
        candidates: &'a [T],
        store: &LearningStore,
        count: usize,
        now_ms: i64,
    ) -> Vec<&'a T> {
        select_for_review_with_config(candidates, store, count, now_ms, &mut self.rng, &self.config)
    }

    pub fn record_answer(
        &self,
        store: &mut LearningStore,
        word: &str,
        is_correct: bool,
        response_time_ms: f64,
        now_ms: i64,
    ) -> Option<WordLearningRecord> {
        store.record_answer(word, is_correct, response_time_ms, now_ms, &self.config)
    }

    pub fn stats(&self, store: &LearningStore) -> LearningStats {
        learning_stats_with_config(store, &self.config)
    }
}

impl Default for ReviewScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Millisecond wall clock with the sub-millisecond nanos mixed in
fn clock_seed() -> u64 {
    let millis = crate::current_time_ms().max(0) as u64;
    let sub_millis = u64::from(chrono::Utc::now().timestamp_subsec_nanos() % 1_000_000);
    millis.wrapping_mul(1_000_000).wrapping_add(sub_millis)
}

// ==================== Unit Tests ====================
