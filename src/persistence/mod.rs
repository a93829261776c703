//! Named-collection storage
//!
//! Records are appended to named collections and read back whole. The
//! simulation never touches a store; callers persist finished runs.
//!
//! - `MemoryStore`: in-process, for tests and one-off runs
//! - `JsonFileStore`: one JSON array per collection in a directory

pub mod file;

pub use file::JsonFileStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::SimError;

/// Append-only store of named record collections
pub trait DataStore {
    /// Append one serialized record to `collection`
    fn push_value(&mut self, collection: &str, value: Value) -> Result<(), SimError>;

    /// Every record in `collection`, oldest first (empty if it does not exist)
    fn values(&self, collection: &str) -> Result<Vec<Value>, SimError>;

    fn add_to_collection<T: Serialize>(&mut self, collection: &str, record: &T) -> Result<(), SimError>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(record)?;
        self.push_value(collection, value)
    }

    fn get_collection<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, SimError>
    where
        Self: Sized,
    {
        self.values(collection)?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(SimError::from))
            .collect()
    }
}

/// Store kept in memory for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: BTreeMap<String, Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }
}

impl DataStore for MemoryStore {
    fn push_value(&mut self, collection: &str, value: Value) -> Result<(), SimError> {
        self.collections.entry(collection.to_owned()).or_default().push(value);
        Ok(())
    }

    fn values(&self, collection: &str) -> Result<Vec<Value>, SimError> {
        Ok(self.collections.get(collection).cloned().unwrap_or_default())
    }
}
