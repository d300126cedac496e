//! High-level dependency tracker for one build session.
//!
//! The `DependencyTracker` ties together the store, the parser and the
//! staleness checks behind the interface a build driver needs: ask whether a
//! Slice file must be translated, feed back the translator's dependency output,
//! and persist the result once the session ends.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use slicedep_common::normalize;
use slicedep_config::TrackerConfig;

use crate::error::DependError;
use crate::parser;
use crate::record::{DependencyMap, DependencyRecord};
use crate::staleness;
use crate::store::DependencyStore;

/// Dependency state for a single build invocation.
///
/// Loaded once at the start of the session, updated in memory as files are
/// translated, and written back with [`persist`](Self::persist).
#[derive(Debug)]
pub struct DependencyTracker {
    /// Backing store on disk.
    store: DependencyStore,

    /// Records known for this session.
    records: DependencyMap,

    /// Evaluate staleness on the rayon pool.
    parallel: bool,
}

impl DependencyTracker {
    /// Opens the store described by `config`.
    pub fn open(config: &TrackerConfig) -> Self {
        let mut tracker = Self::load_or_create(&config.dependency_file_path());
        tracker.parallel = config.parallel;
        tracker
    }

    /// Loads the store at `store_path`, starting empty if it cannot be used.
    pub fn load_or_create(store_path: &Path) -> Self {
        let store = DependencyStore::new(store_path);
        let records = store.load();
        Self {
            store,
            records,
            parallel: false,
        }
    }

    /// Enables or disables parallel staleness evaluation.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// Location of the backing store.
    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    /// All records known for this session.
    pub fn records(&self) -> &DependencyMap {
        &self.records
    }

    /// Returns the record for `target`, if one is known.
    pub fn record_for(&self, target: &Path) -> Option<&DependencyRecord> {
        self.records.get(&normalize(target))
    }

    /// Returns `true` if `target` does not need to be translated again.
    ///
    /// A target without a record always needs a build.
    pub fn is_up_to_date(&self, target: &Path) -> bool {
        match self.record_for(target) {
            Some(record) => staleness::is_up_to_date(record),
            None => {
                tracing::debug!(target = %target.display(), "stale: no recorded dependencies");
                false
            }
        }
    }

    /// Returns the candidates that need to be translated, in input order.
    pub fn stale_targets(&self, candidates: &[PathBuf]) -> Vec<PathBuf> {
        if self.parallel {
            candidates
                .par_iter()
                .filter(|c| !self.is_up_to_date(c))
                .cloned()
                .collect()
        } else {
            candidates
                .iter()
                .filter(|c| !self.is_up_to_date(c))
                .cloned()
                .collect()
        }
    }

    /// Ingests the dependency output of a translator run for `target`.
    ///
    /// Every rule in `raw` replaces the record of its target. Nothing is
    /// changed if `raw` is malformed. Returns the number of records stored.
    pub fn record_new_dependencies(
        &mut self,
        target: &Path,
        raw: &str,
    ) -> Result<usize, DependError> {
        let fresh = parser::parse(raw)?;
        let key = normalize(target);
        if !fresh.iter().any(|r| r.target() == key) {
            tracing::warn!(
                target = %target.display(),
                rules = fresh.len(),
                "translator output has no dependency rule for the translated file"
            );
        }

        let count = fresh.len();
        self.records.extend(fresh);
        Ok(count)
    }

    /// Drops the record for `target`, e.g. after its source was removed.
    pub fn forget(&mut self, target: &Path) -> Option<DependencyRecord> {
        self.records.remove(&normalize(target))
    }

    /// Drops every record whose target is not in `live`.
    ///
    /// Returns how many records were removed.
    pub fn retain_targets(&mut self, live: &[PathBuf]) -> usize {
        let live: Vec<PathBuf> = live.iter().map(|p| normalize(p)).collect();
        let before = self.records.len();
        self.records.retain(|target| live.iter().any(|l| l == target));
        before - self.records.len()
    }

    /// Writes the session's records back to the store.
    pub fn persist(&self) -> Result<(), DependError> {
        self.store.save(&self.records)
    }
}
