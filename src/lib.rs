//! # danci-scheduler - 词汇复习调度核心库
//!
//! 本 crate 提供纯 Rust 实现的自适应复习调度:
//!
//! - **Update Policy** - 有界权重的间隔重复更新 (快答/慢答/连对奖励/答错重置)
//! - **Decay Model** - 逾期对数衰减修正
//! - **Selector** - 无放回加权随机抽样
//! - **Migrator** - 旧版 `word -> weight` 存储迁移
//! - **Stats Reporter** - 掌握/学习中/困难 统计
//!
//! ## 设计理念
//!
//! - **纯函数** - 核心不做 I/O，学习存储由宿主持有并显式传入
//! - **可复现** - 随机源可注入，测试中使用固定种子
//! - **有界** - 权重、间隔、难度系数在每条写入路径上都被限制在合法范围内
//!
//! ## 模块结构
//!
//! - [`record`] - 默认记录与答题更新
//! - [`decay`] - 有效权重 (逾期修正)
//! - [`selector`] - 优先级评分与加权抽样
//! - [`migrate`] - 存储加载与旧格式迁移
//! - [`stats`] - 学习统计与单词报告
//! - [`config`] - 调度参数
//! - [`sanitize`] - 数据清洗 (范围限制、响应时间校验)
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use danci_scheduler::{load_store, learning_stats, ReviewScheduler};
//!
//! let mut store = load_store(r#"{"dog": 3, "cat": 0.8}"#);
//! let mut scheduler = ReviewScheduler::with_seed(42);
//!
//! let words = vec!["dog".to_string(), "cat".to_string(), "dog".to_string()];
//! let now = 1_700_000_000_000;
//! let session = scheduler.select_for_review(&words, &store, 2, now);
//! assert_eq!(session.len(), 2);
//!
//! let word = session[0].clone();
//! scheduler.record_answer(&mut store, &word, true, 1200.0, now);
//! assert_eq!(learning_stats(&store).total_words, 2);
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod config;
pub mod decay;
pub mod error;
pub mod migrate;
pub mod record;
pub mod sanitize;
pub mod selector;
pub mod stats;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

pub use config::SchedulerConfig;
pub use error::{Result, SchedulerError};

/// 重新导出记录工厂与更新策略
pub use record::{adjusted_response_time, create_default, update_record, update_record_with_config};

/// 重新导出衰减模型
pub use decay::{days_since_review, effective_weight, is_overdue, overdue_factor};

/// 重新导出选择器
pub use selector::{
    priority_score, score_candidates, select_for_review, select_for_review_with_config,
    weighted_sample, ReviewScheduler, ScoredCandidate,
};

/// 重新导出迁移
pub use migrate::{load_store, migrate_legacy, resolve_store, LoadSource};

/// 重新导出统计
pub use stats::{
    learning_stats, learning_stats_with_config, mastery_percent, word_details, Difficulty,
    LearningStats, WordDetail, WordStatus,
};

/// Current wall-clock time in milliseconds since the epoch
///
/// Core functions take `now_ms` explicitly; this is for hosts that do not
/// keep their own clock.
pub fn current_time_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
