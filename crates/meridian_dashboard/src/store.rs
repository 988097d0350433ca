// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Persistence of the displayed locations.
//!
//! The store is a JSON object of string keys, so several tools can share one file. The
//! location list lives under [`LOCATIONS_STORAGE_KEY`] as a JSON-encoded string; every other
//! key is left untouched when the list is saved.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use meridian::Location;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::{DashboardError, Result};

/// The key under which the location list is stored.
pub const LOCATIONS_STORAGE_KEY: &str = "locations-storage-key";

/// A JSON key-value file holding the dashboard's location list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationStore {
    path: PathBuf,
}

impl LocationStore {
    /// Opens the store at `path`. The file is created on the first save.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file backing the store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored locations.
    ///
    /// A missing file or a file without the locations key yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Io`] when the file cannot be read and [`DashboardError::Json`]
    /// when it is not a JSON object or the stored list is malformed.
    pub fn load(&self) -> Result<Vec<Location>> {
        let entries = self.read_entries()?;

        let locations = match entries.get(LOCATIONS_STORAGE_KEY) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(encoded)) => {
                serde_json::from_str(encoded).map_err(|error| DashboardError::json(&self.path, error))?
            }
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|error| DashboardError::json(&self.path, error))?
            }
        };

        tracing::debug!(path = %self.path.display(), count = locations.len(), "locations loaded");
        Ok(locations)
    }

    /// Replaces the stored locations with `locations`.
    ///
    /// The file is replaced atomically: the new contents are written to a temporary file next
    /// to it, which is then renamed over the store.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Io`] when the file cannot be read or written and
    /// [`DashboardError::Json`] when the existing file is not a JSON object.
    pub fn save(&self, locations: &[Location]) -> Result<()> {
        let mut entries = self.read_entries()?;

        let encoded = serde_json::to_string(locations).map_err(|error| DashboardError::json(&self.path, error))?;
        entries.insert(LOCATIONS_STORAGE_KEY.to_string(), Value::String(encoded));

        let contents =
            serde_json::to_string_pretty(&entries).map_err(|error| DashboardError::json(&self.path, error))?;
        self.replace_contents(contents.as_bytes()).map_err(|error| DashboardError::io(&self.path, error))?;

        tracing::debug!(path = %self.path.display(), count = locations.len(), "locations saved");
        Ok(())
    }

    fn replace_contents(&self, contents: &[u8]) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(contents)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|error| error.error)?;

        Ok(())
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(error) => return Err(DashboardError::io(&self.path, error)),
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&contents).map_err(|error| DashboardError::json(&self.path, error))
    }
}
