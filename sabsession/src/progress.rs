//! Durable storage of the last-played episode per folder
//!
//! The progress record is a single pretty-printed JSON document shared by
//! every session (last writer wins). Writes go through a temporary file in
//! the same directory followed by an atomic rename, so a crash mid-write
//! never corrupts the previously committed record. Reads absorb every
//! failure and degrade to the empty record.

use crate::config_ext::SessionConfigExt;
use crate::error::Result;
use sabconfig::Config;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Prefix of the temporary files used for atomic replacement
const TEMP_PREFIX: &str = "progress_";

/// Persisted progress record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Folder of the most recent selection, across all folders
    #[serde(default)]
    pub last_folder: String,
    /// File name of the most recent selection
    #[serde(default)]
    pub last_file: String,
    /// Last-selected file name, per folder path
    #[serde(default)]
    pub per_folder: BTreeMap<String, String>,
}

/// Progress store backed by an atomically replaced JSON file
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Create a store over the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the configured progress file location
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.get_progress_path()?))
    }

    /// The file path backing this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record
    ///
    /// Any failure (missing file, unreadable file, corrupt JSON) yields the
    /// empty record; this never raises to the caller.
    pub fn read(&self) -> ProgressRecord {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(record) => record,
                Err(e) => {
                    debug!("Progress file unreadable, starting empty: {}", e);
                    ProgressRecord::default()
                }
            },
            Err(e) => {
                debug!("Progress file not read, starting empty: {}", e);
                ProgressRecord::default()
            }
        }
    }

    /// Durably replace the record
    ///
    /// The JSON document is written to a temporary file in the target
    /// directory, then renamed over the store path. Stale temporaries left
    /// by interrupted writes are removed best-effort first.
    pub fn write(&self, record: &ProgressRecord) -> Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(&dir)?;
        self.cleanup_stale_temps(&dir);

        let json = serde_json::to_string_pretty(record)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".json")
            .tempfile_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Record a selection and persist
    ///
    /// Updates the global `last_folder`/`last_file` pair and the per-folder
    /// mapping, then writes. Safe to call on every selection change.
    pub fn update(&self, folder: &str, file_name: &str) -> Result<()> {
        let mut record = self.read();
        record.last_folder = folder.to_string();
        record.last_file = file_name.to_string();
        record
            .per_folder
            .insert(folder.to_string(), file_name.to_string());
        self.write(&record)
    }

    /// Pick the remembered episode for a folder
    ///
    /// Returns the folder-specific remembered name when it is still among
    /// `available`; otherwise the globally remembered file when its folder
    /// matches and the file is still present; otherwise `None`, and the caller
    /// falls back to a default selection.
    pub fn pick_last(&self, folder: &str, available: &[String]) -> Option<String> {
        let record = self.read();

        if let Some(candidate) = record.per_folder.get(folder) {
            if available.iter().any(|n| n == candidate) {
                return Some(candidate.clone());
            }
        }

        if record.last_folder == folder && available.iter().any(|n| n == &record.last_file) {
            return Some(record.last_file);
        }

        None
    }

    fn parent_dir(&self) -> PathBuf {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Remove leftover temporaries from interrupted writes (best-effort)
    fn cleanup_stale_temps(&self, dir: &Path) {
        let Ok(entries) = fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(TEMP_PREFIX) && name.ends_with(".json") {
                if let Err(e) = fs::remove_file(entry.path()) {
                    warn!("Could not remove stale temp file {}: {}", name, e);
                }
            }
        }
    }
}
