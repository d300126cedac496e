//! Persistent storage for dependency records.
//!
//! The store is a JSON document holding a format version, the name of the
//! tool that wrote it, and every record sorted by target. Loading is
//! fail-safe: a missing, unreadable, corrupt, or foreign-version store yields
//! an empty map, which at worst triggers a full rebuild. Saving is not: losing
//! the store silently would turn every later build into a full rebuild.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DependError;
use crate::record::{DependencyMap, DependencyRecord};

/// Current store format version. Increment on breaking changes to the layout.
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Identifies the writer of a store file.
const GENERATOR: &str = concat!("slicedep ", env!("CARGO_PKG_VERSION"));

/// The fields read before trusting the rest of the document.
#[derive(Deserialize)]
struct StoreHeader {
    format_version: u32,
}

#[derive(Serialize)]
struct StoreFileOut<'a> {
    format_version: u32,
    generator: &'static str,
    records: Vec<&'a DependencyRecord>,
}

#[derive(Deserialize)]
struct StoreFileIn {
    records: Vec<DependencyRecord>,
}

/// A dependency store at a fixed location on disk.
#[derive(Debug, Clone)]
pub struct DependencyStore {
    path: PathBuf,
}

impl DependencyStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored records, returning an empty map on any failure.
    pub fn load(&self) -> DependencyMap {
        match self.try_load() {
            Ok(map) => {
                tracing::info!(path = %self.path.display(), records = map.len(), "loaded dependency store");
                map
            }
            Err(DependError::StoreUnreadable { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::debug!(path = %self.path.display(), "no dependency store yet; starting empty");
                DependencyMap::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring dependency store; starting empty");
                DependencyMap::new()
            }
        }
    }

    /// Loads the stored records, reporting why the store could not be used.
    pub fn try_load(&self) -> Result<DependencyMap, DependError> {
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| DependError::StoreUnreadable {
                path: self.path.clone(),
                source: e,
            })?;

        let header: StoreHeader =
            serde_json::from_str(&content).map_err(|e| self.corrupt(e.to_string()))?;
        if header.format_version != STORE_FORMAT_VERSION {
            return Err(DependError::StoreVersionMismatch {
                path: self.path.clone(),
                expected: STORE_FORMAT_VERSION,
                actual: header.format_version,
            });
        }

        let file: StoreFileIn =
            serde_json::from_str(&content).map_err(|e| self.corrupt(e.to_string()))?;
        Ok(file.records.into_iter().collect())
    }

    /// Writes every record in `map`, replacing the previous contents.
    ///
    /// Creates the parent directory if needed. The document is written to a
    /// temporary file next to the store and renamed over it, so readers never
    /// observe a partially written store.
    pub fn save(&self, map: &DependencyMap) -> Result<(), DependError> {
        let document = StoreFileOut {
            format_version: STORE_FORMAT_VERSION,
            generator: GENERATOR,
            records: map.sorted(),
        };
        let json = serde_json::to_string_pretty(&document).map_err(|e| {
            DependError::Serialization {
                reason: e.to_string(),
            }
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| self.unwritable(e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| self.unwritable(e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.flush())
            .map_err(|e| self.unwritable(e))?;
        tmp.persist(&self.path).map_err(|e| self.unwritable(e.error))?;

        tracing::info!(path = %self.path.display(), records = map.len(), "saved dependency store");
        Ok(())
    }

    fn corrupt(&self, reason: String) -> DependError {
        DependError::StoreCorrupt {
            path: self.path.clone(),
            reason,
        }
    }

    fn unwritable(&self, source: std::io::Error) -> DependError {
        DependError::StoreUnwritable {
            path: self.path.clone(),
            source,
        }
    }
}
