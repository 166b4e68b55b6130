//! File-backed restaurant store.
//!
//! The store is a single JSON array of restaurant objects. Records that do
//! not fit the [`Restaurant`] shape are kept verbatim and written back as-is.
//! Parsed records are written back from their stored object with only the
//! labels the driver assigns patched in.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::Restaurant;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access restaurant store {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("restaurant store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("restaurant store must be a JSON array of objects")]
    NotAnArray,
}

/// A stored record, parsed when possible
#[derive(Debug, Clone)]
pub enum Record {
    Restaurant(Restaurant),
    Unparsed { value: Value, reason: String },
}

impl Record {
    fn from_value(value: Value) -> Self {
        match serde_json::from_value::<Restaurant>(value.clone()) {
            Ok(restaurant) => Record::Restaurant(restaurant),
            Err(e) => Record::Unparsed {
                value,
                reason: e.to_string(),
            },
        }
    }

    /// Stored form of the record, starting from the object it was read from
    fn to_value(&self, source: &Value) -> Result<Value, serde_json::Error> {
        match (self, source) {
            (Record::Restaurant(r), Value::Object(map)) => {
                let mut map = map.clone();
                patch_label(&mut map, "neighborhood", r.neighborhood.as_deref());
                patch_label(&mut map, "city", r.city.as_deref());
                Ok(Value::Object(map))
            }
            (Record::Restaurant(r), _) => serde_json::to_value(r),
            (Record::Unparsed { value, .. }, _) => Ok(value.clone()),
        }
    }
}

/// Overwrite `key` only when the label differs from what is stored
fn patch_label(map: &mut Map<String, Value>, key: &str, label: Option<&str>) {
    if map.get(key).and_then(Value::as_str) == label {
        return;
    }
    match label {
        Some(label) => {
            map.insert(key.to_string(), Value::String(label.to_string()));
        }
        None => {
            map.remove(key);
        }
    }
}

pub struct RestaurantStore {
    path: PathBuf,
    records: Vec<Record>,
    /// Objects as read from disk, one per record
    sources: Vec<Value>,
}

impl RestaurantStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        let sources = match serde_json::from_str::<Value>(&content)? {
            Value::Array(values) => values,
            _ => return Err(StoreError::NotAnArray),
        };
        let records = sources.iter().cloned().map(Record::from_value).collect::<Vec<_>>();

        let unparsed = records
            .iter()
            .filter(|r| matches!(r, Record::Unparsed { .. }))
            .count();
        if unparsed > 0 {
            warn!("{} records in {} could not be parsed", unparsed, path.display());
        }
        info!("Loaded {} restaurants from {}", records.len(), path.display());

        Ok(Self {
            path,
            records,
            sources,
        })
    }

    /// In-memory store, mainly for tests. Restaurants are saved in full.
    pub fn from_records(path: impl Into<PathBuf>, records: Vec<Record>) -> Self {
        let sources = vec![Value::Null; records.len()];
        Self {
            path: path.into(),
            records,
            sources,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write all records back, replacing the file atomically.
    ///
    /// The temporary file lives next to the store and is removed if the
    /// write or the final rename fails.
    pub fn save(&self) -> Result<(), StoreError> {
        let values = self
            .records
            .iter()
            .zip(&self.sources)
            .map(|(record, source)| record.to_value(source))
            .collect::<Result<Vec<_>, _>>()?;
        let body = serde_json::to_vec_pretty(&Value::Array(values))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let mut file = NamedTempFile::new_in(dir).map_err(io_err)?;
        file.write_all(&body).map_err(io_err)?;
        file.as_file().sync_all().map_err(io_err)?;
        file.persist(&self.path).map_err(|e| io_err(e.error))?;

        info!("Saved {} restaurants to {}", self.records.len(), self.path.display());
        Ok(())
    }
}
