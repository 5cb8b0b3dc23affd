//! Store Migration
//!
//! Upgrades the legacy `word -> weight` map into structured learning records
//! and loads persisted blobs leniently. The `version` key is the only
//! discriminator: a blob carrying it is already structured.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::sanitize::clamp_weight;
use crate::types::{LearningStore, WordLearningRecord, STORE_VERSION, VERSION_KEY};

/// Interval for legacy words the old system judged hard (weight > 1)
const LEGACY_HARD_INTERVAL: f64 = 1.0;

/// Interval for the remaining legacy words
const LEGACY_EASY_INTERVAL: f64 = 3.0;

/// Where a loaded store came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoadSource {
    /// The structured blob was used as is
    Stored,
    /// Built from the legacy blob; the host should persist it and drop the legacy data
    MigratedLegacy,
    /// Nothing usable was found
    Fresh,
}

/// Normalize any persisted blob into a structured store
///
/// Null, non-object and empty inputs give an empty store. Never fails.
pub fn migrate_legacy(value: &Value) -> LearningStore {
    let object = match value.as_object() {
        Some(object) if !object.is_empty() => object,
        _ => return LearningStore::new(),
    };

    if object.contains_key(VERSION_KEY) {
        return LearningStore::from_value(value).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Versioned learning store is malformed, starting fresh");
            LearningStore::new()
        });
    }

    let mut store = LearningStore::new();
    let mut skipped = 0usize;
    for (word, entry) in object {
        match legacy_record(word, entry) {
            Some(record) => {
                store.insert(record);
            }
            None => {
                skipped += 1;
                tracing::warn!(word = %word, "Skipping legacy entry without a numeric weight");
            }
        }
    }

    tracing::debug!(
        migrated = store.len(),
        skipped,
        version = STORE_VERSION,
        "Migrated legacy word weights"
    );
    store
}

fn legacy_record(word: &str, entry: &Value) -> Option<WordLearningRecord> {
    let raw_weight = entry.as_f64().filter(|w| w.is_finite())?;
    let interval = if raw_weight > 1.0 {
        LEGACY_HARD_INTERVAL
    } else {
        LEGACY_EASY_INTERVAL
    };
    Some(WordLearningRecord {
        weight: clamp_weight(raw_weight),
        interval,
        ..WordLearningRecord::new(word)
    })
}

/// Parse and normalize a raw JSON blob
///
/// Unparsable input is treated as absent.
pub fn load_store(json: &str) -> LearningStore {
    match serde_json::from_str::<Value>(json) {
        Ok(value) => migrate_legacy(&value),
        Err(err) => {
            tracing::warn!(error = %err, "Learning store is not valid JSON, starting fresh");
            LearningStore::new()
        }
    }
}

/// Pick the store to use from the structured and legacy blobs
///
/// A structured blob is used only if it carries a version; otherwise legacy
/// data is migrated when present.
pub fn resolve_store(stored: Option<&str>, legacy: Option<&str>) -> (LearningStore, LoadSource) {
    if let Some(value) = stored.and_then(parse_blob) {
        if value.get(VERSION_KEY).is_some() {
            if let Ok(store) = LearningStore::from_value(&value) {
                return (store, LoadSource::Stored);
            }
            tracing::warn!("Stored learning data is malformed, ignoring it");
        }
    }

    if let Some(value) = legacy.and_then(parse_blob) {
        if value.is_object() {
            return (migrate_legacy(&value), LoadSource::MigratedLegacy);
        }
    }

    (LearningStore::new(), LoadSource::Fresh)
}

fn parse_blob(json: &str) -> Option<Value> {
    serde_json::from_str(json)
        .map_err(|err| tracing::warn!(error = %err, "Ignoring unparsable learning data"))
        .ok()
}

impl LearningStore {
    /// Strict parse of a structured blob
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        LearningStore::from_value(&value)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
