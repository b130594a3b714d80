//! Directory-backed settings store
//!
//! Maps each resource to `<name>.json` under a root directory. Writes are
//! atomic (serialize → temp file → rename) so a crashed write never leaves
//! a half-document behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{SettingsStore, StoreError};

/// Store persisting each resource as a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, resource: &str) -> PathBuf {
        self.root.join(format!("{resource}.json"))
    }
}

impl SettingsStore for FileStore {
    fn get(&self, resource: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(resource);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Io(err)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|err| StoreError::Malformed(format!("{}: {err}", path.display())))
    }

    fn put(&self, resource: &str, document: &Value) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(resource);
        let json = serde_json::to_string_pretty(document)?;

        // Write-then-rename keeps the visible file whole at all times.
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;
        Ok(())
    }
}
