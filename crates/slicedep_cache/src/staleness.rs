//! Deciding whether a recorded translation is still valid.
//!
//! A record is up to date when every file it lists still exists and none was
//! modified after the record's timestamp. A modification time equal to the
//! timestamp counts as up to date, so re-saving within one timestamp tick does
//! not trigger a rebuild.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::record::DependencyRecord;

/// The first reason a record was found to be stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleItem {
    /// The record lists no files at all and cannot be trusted.
    NoDependencies,
    /// A dependency no longer exists.
    MissingFile {
        /// The missing file.
        path: PathBuf,
    },
    /// A dependency exists but its modification time could not be read.
    FailedToReadMetadata {
        /// The unreadable file.
        path: PathBuf,
    },
    /// A dependency was modified after the record was taken.
    ChangedFile {
        /// The modified file.
        path: PathBuf,
        /// When the record was taken.
        recorded: SystemTime,
        /// The file's current modification time.
        modified: SystemTime,
    },
}

impl StaleItem {
    /// Emits a `debug` event explaining why `target` must be rebuilt.
    pub fn log(&self, target: &Path) {
        match self {
            StaleItem::NoDependencies => {
                tracing::debug!(target = %target.display(), "stale: record lists no dependencies");
            }
            StaleItem::MissingFile { path } => {
                tracing::debug!(target = %target.display(), path = %path.display(), "stale: missing dependency");
            }
            StaleItem::FailedToReadMetadata { path } => {
                tracing::debug!(target = %target.display(), path = %path.display(), "stale: couldn't read metadata");
            }
            StaleItem::ChangedFile {
                path,
                recorded,
                modified,
            } => {
                tracing::debug!(
                    target = %target.display(),
                    path = %path.display(),
                    ?recorded,
                    ?modified,
                    "stale: dependency changed"
                );
            }
        }
    }
}

impl fmt::Display for StaleItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleItem::NoDependencies => write!(f, "no dependencies recorded"),
            StaleItem::MissingFile { path } => write!(f, "missing {}", path.display()),
            StaleItem::FailedToReadMetadata { path } => {
                write!(f, "couldn't read metadata of {}", path.display())
            }
            StaleItem::ChangedFile { path, .. } => write!(f, "changed {}", path.display()),
        }
    }
}

/// Returns the first reason `record` is stale, or `None` if it is up to date.
pub fn find_stale_item(record: &DependencyRecord) -> Option<StaleItem> {
    if record.dependencies().is_empty() {
        return Some(StaleItem::NoDependencies);
    }

    let recorded = record.timestamp();
    for path in record.dependencies() {
        let modified = match std::fs::metadata(path).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Some(StaleItem::MissingFile { path: path.clone() });
            }
            Err(_) => {
                return Some(StaleItem::FailedToReadMetadata { path: path.clone() });
            }
        };

        if modified > recorded {
            return Some(StaleItem::ChangedFile {
                path: path.clone(),
                recorded,
                modified,
            });
        }
    }

    None
}

/// Returns `true` if the translation described by `record` may be skipped.
pub fn is_up_to_date(record: &DependencyRecord) -> bool {
    match find_stale_item(record) {
        None => {
            tracing::debug!(target = %record.target().display(), "up to date");
            true
        }
        Some(item) => {
            item.log(record.target());
            false
        }
    }
}
