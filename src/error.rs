//! Error types

/// Errors raised by strict scheduler entry points
///
/// Lenient paths (store loading, legacy migration) recover instead of failing.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid store: {0}")]
    InvalidStore(String),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
