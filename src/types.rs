//! Common Types and Constants
//!
//! Shared data structures used across all scheduler modules.

use std::collections::HashMap;

use serde::de::{Deserializer, Error as _};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SchedulerError};
use crate::sanitize::sanitize_record;

// ==================== Constants ====================

/// Minimum selection weight (best known)
pub const MIN_WEIGHT: f64 = 0.5;

/// Maximum selection weight (most urgent)
pub const MAX_WEIGHT: f64 = 8.0;

/// Minimum review interval in days
pub const MIN_INTERVAL: f64 = 1.0;

/// Maximum review interval in days
pub const MAX_INTERVAL: f64 = 365.0;

/// Minimum ease factor
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Maximum ease factor
pub const MAX_EASE_FACTOR: f64 = 2.5;

/// Milliseconds in one day
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Current store schema version
pub const STORE_VERSION: u32 = 1;

/// Reserved key carrying the schema version in a serialized store
pub const VERSION_KEY: &str = "version";

// ==================== Word Record ====================

/// Per-word learning state
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordLearningRecord {
    /// Surface form of the vocabulary item
    pub word: String,
    /// Inverse mastery signal [0.5, 8.0], higher means more urgent
    pub weight: f64,
    /// Days until next expected review [1, 365]
    pub interval: f64,
    /// Difficulty modifier [1.3, 2.5]
    pub ease_factor: f64,
    /// Last answer timestamp (ms since epoch), None if never reviewed
    pub last_reviewed: Option<i64>,
    /// Processed answers
    pub review_count: u32,
    /// Consecutive correct answers
    pub correct_streak: u32,
    /// Rolling response time average (ms), 0 before the first review
    pub avg_response_time: f64,
}

impl Default for WordLearningRecord {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl WordLearningRecord {
    /// Default state for a word that has never been scored
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            weight: 1.0,
            interval: 1.0,
            ease_factor: MAX_EASE_FACTOR,
            last_reviewed: None,
            review_count: 0,
            correct_streak: 0,
            avg_response_time: 0.0,
        }
    }

    /// Whether the word has ever been answered
    pub fn is_reviewed(&self) -> bool {
        self.last_reviewed.is_some()
    }
}

// ==================== Learning Store ====================

/// All learning records of one learner plus the schema version
///
/// Serialized as a single flat object: `{"version": 1, "<word>": {..}, ..}`.
#[derive(Clone, Debug, PartialEq)]
pub struct LearningStore {
    /// Schema version
    pub version: u32,
    records: HashMap<String, WordLearningRecord>,
}

impl Default for LearningStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LearningStore {
    /// Empty store at the current version
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION,
            records: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&WordLearningRecord> {
        self.records.get(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.records.contains_key(word)
    }

    /// Stored record, or a fresh default that is not persisted
    pub fn record_or_default(&self, word: &str) -> WordLearningRecord {
        self.records
            .get(word)
            .cloned()
            .unwrap_or_else(|| WordLearningRecord::new(word))
    }

    /// Whether `word` collides with the version tag of the flat JSON form
    pub fn is_reserved_word(word: &str) -> bool {
        word == VERSION_KEY
    }

    /// Insert or replace a record, keyed by its word
    ///
    /// Bounds are enforced before the record is stored. A record for the
    /// reserved `version` key is refused and `false` is returned.
    pub fn insert(&mut self, record: WordLearningRecord) -> bool {
        if Self::is_reserved_word(&record.word) {
            tracing::warn!(word = %record.word, "Refusing record under the reserved version key");
            return false;
        }
        let record = sanitize_record(record);
        self.records.insert(record.word.clone(), record);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &WordLearningRecord)> {
        self.records.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &WordLearningRecord> {
        self.records.values()
    }

    /// Drop every record, keeping the version tag
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Serialize to the flat JSON object form
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(self.records.len() + 1);
        map.insert(VERSION_KEY.to_string(), Value::from(self.version));
        for (word, record) in &self.records {
            map.insert(
                word.clone(),
                serde_json::to_value(record).unwrap_or(Value::Null),
            );
        }
        Value::Object(map)
    }

    /// Build a store from a flat JSON object that carries a version tag
    ///
    /// Entries that are not record objects are skipped. Missing record
    /// fields take their defaults and the record word is taken from its key.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            SchedulerError::InvalidStore("learning store must be a JSON object".to_string())
        })?;
        let version = match object.get(VERSION_KEY) {
            Some(v) => parse_version(v).unwrap_or_else(|| {
                tracing::warn!(version = %v, "Unreadable store version, assuming current");
                STORE_VERSION
            }),
            None => {
                return Err(SchedulerError::InvalidStore(
                    "learning store has no version".to_string(),
                ))
            }
        };

        let mut store = Self {
            version,
            records: HashMap::with_capacity(object.len().saturating_sub(1)),
        };
        for (word, entry) in object {
            if word == VERSION_KEY {
                continue;
            }
            match parse_record(word, entry) {
                Some(record) => {
                    store.insert(record);
                }
                None => {
                    tracing::warn!(word = %word, "Skipping malformed learning record");
                }
            }
        }
        Ok(store)
    }
}

/// Numeric version tag; numeric strings such as `"1"` are accepted too
fn parse_version(value: &Value) -> Option<u32> {
    let number = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        other => other.as_f64()?,
    };
    if number.is_finite() && number >= 0.0 {
        Some(number.min(u32::MAX as f64) as u32)
    } else {
        None
    }
}

fn parse_record(word: &str, entry: &Value) -> Option<WordLearningRecord> {
    if !entry.is_object() {
        return None;
    }
    let mut record: WordLearningRecord = serde_json::from_value(entry.clone()).ok()?;
    record.word = word.to_string();
    Some(record)
}

impl Serialize for LearningStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len() + 1))?;
        map.serialize_entry(VERSION_KEY, &self.version)?;
        for (word, record) in &self.records {
            map.serialize_entry(word, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for LearningStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        LearningStore::from_value(&value).map_err(D::Error::custom)
    }
}

// ==================== Candidates ====================

/// Anything the selector can schedule, keyed by its word
pub trait ReviewCandidate {
    fn word(&self) -> &str;
}

impl ReviewCandidate for String {
    fn word(&self) -> &str {
        self
    }
}

impl ReviewCandidate for &str {
    fn word(&self) -> &str {
        self
    }
}

impl<T: ReviewCandidate + ?Sized> ReviewCandidate for Box<T> {
    fn word(&self) -> &str {
        (**self).word()
    }
}

/// Vocabulary entry as delivered by a word list
///
/// Fields other than `word` (definition, example, translation, ...) are kept
/// opaque; scheduling never reads them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub word: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VocabularyItem {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            extra: Map::new(),
        }
    }
}

impl ReviewCandidate for VocabularyItem {
    fn word(&self) -> &str {
        &self.word
    }
}
