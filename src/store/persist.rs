//! Persistence codec over a key-value blob collaborator.
//!
//! The medium (browser storage, a file, a table) is the collaborator's
//! business; this module owns the JSON layout: a single array of Feature
//! objects under one well-known key, no version field. Decode is lenient
//! per entry: one corrupt record never takes the collection down.

use log::warn;
use serde_json::Value;
use thiserror::Error;

use crate::store::feature::Feature;

/// Storage key for the polygon collection.
pub const DEFAULT_STORAGE_KEY: &str = "aoi-polygons";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend rejected the write: {0}")]
    Backend(String),
}

/// Key-value blob storage collaborator.
///
/// Design rule: implementations hold bytes, nothing else. They never see
/// `Feature` values and never parse JSON.
pub trait BlobStore {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Load the persisted collection.
///
/// Any failure (missing key, non-JSON blob, non-array root) degrades to
/// an empty collection with a warning. Individually malformed entries are
/// dropped; the valid remainder survives.
pub fn load_features(store: &dyn BlobStore, key: &str) -> Vec<Feature> {
    let Some(raw) = store.get(key) else {
        return Vec::new();
    };

    let entries: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("stored polygon blob under {key:?} did not parse, starting empty: {err}");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Feature>(entry) {
            Ok(feature) => Some(feature),
            Err(err) => {
                warn!("dropping malformed stored feature: {err}");
                None
            }
        })
        .collect()
}

/// Overwrite the persisted collection. Failures are logged, never raised.
///
/// Returns whether the write landed.
pub fn save_features(store: &mut dyn BlobStore, key: &str, features: &[Feature]) -> bool {
    let blob = match serde_json::to_string(features) {
        Ok(blob) => blob,
        Err(err) => {
            warn!("polygon collection did not serialize: {err}");
            return false;
        }
    };
    match store.put(key, &blob) {
        Ok(()) => true,
        Err(err) => {
            warn!("saving polygon collection failed: {err}");
            false
        }
    }
}
