//! Directory-backed store
//!
//! Each collection is `<dir>/<name>.json` holding a JSON array. Writes go to a
//! temporary file first and are renamed over the old one.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::DataStore;
use crate::error::SimError;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, SimError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, collection: &str) -> Result<PathBuf, SimError> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(SimError::InvalidArgument(
                "collection names are limited to letters, digits, '_' and '-'",
            ));
        }
        Ok(self.dir.join(format!("{collection}.json")))
    }
}

impl DataStore for JsonFileStore {
    fn push_value(&mut self, collection: &str, value: Value) -> Result<(), SimError> {
        let path = self.path_for(collection)?;
        let mut values = self.values(collection)?;
        values.push(value);

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(&values)?)?;
        fs::rename(&tmp, &path)?;
        log::debug!("{} now holds {} records", path.display(), values.len());
        Ok(())
    }

    fn values(&self, collection: &str) -> Result<Vec<Value>, SimError> {
        let path = self.path_for(collection)?;
        match fs::read_to_string(&path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }
}
