//! Dependency records and the typed map that holds them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::error::DependError;

/// The dependencies of one translated Slice file.
///
/// `dependencies[0]` is the target itself, followed by every file the target
/// pulled in when it was last translated. `timestamp` is the moment that list
/// was known accurate, i.e. the time of the translation.
///
/// Records are immutable. Retranslating a file produces a new record that
/// replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRecord {
    target: PathBuf,
    dependencies: Vec<PathBuf>,
    timestamp: SystemTime,
}

impl DependencyRecord {
    /// Creates a record whose target is the first dependency.
    ///
    /// Fails if `dependencies` is empty.
    pub fn new(dependencies: Vec<PathBuf>, timestamp: SystemTime) -> Result<Self, DependError> {
        let target = dependencies
            .first()
            .cloned()
            .ok_or_else(|| DependError::InvalidRecord {
                reason: "dependency list is empty".to_string(),
            })?;
        Ok(Self {
            target,
            dependencies,
            timestamp,
        })
    }

    /// The file this record describes.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Every file the target depends on, the target first.
    pub fn dependencies(&self) -> &[PathBuf] {
        &self.dependencies
    }

    /// When the dependency list was recorded.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

/// Dependency records keyed by their target path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    records: HashMap<PathBuf, DependencyRecord>,
}

impl DependencyMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked targets.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no target is tracked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up the record for `target`.
    pub fn get(&self, target: &Path) -> Option<&DependencyRecord> {
        self.records.get(target)
    }

    /// Returns `true` if `target` has a record.
    pub fn contains(&self, target: &Path) -> bool {
        self.records.contains_key(target)
    }

    /// Inserts `record` under its target, returning the record it replaced.
    pub fn insert(&mut self, record: DependencyRecord) -> Option<DependencyRecord> {
        self.records.insert(record.target.clone(), record)
    }

    /// Removes and returns the record for `target`.
    pub fn remove(&mut self, target: &Path) -> Option<DependencyRecord> {
        self.records.remove(target)
    }

    /// Keeps only the records whose target satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&Path) -> bool) {
        self.records.retain(|target, _| keep(target));
    }

    /// Returns the records ordered by target path.
    pub fn sorted(&self) -> Vec<&DependencyRecord> {
        let mut records: Vec<_> = self.records.values().collect();
        records.sort_by(|a, b| a.target.cmp(&b.target));
        records
    }
}

impl FromIterator<DependencyRecord> for DependencyMap {
    fn from_iter<I: IntoIterator<Item = DependencyRecord>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl Extend<DependencyRecord> for DependencyMap {
    fn extend<I: IntoIterator<Item = DependencyRecord>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn record(paths: &[&str], secs: u64) -> DependencyRecord {
        DependencyRecord::new(
            paths.iter().map(PathBuf::from).collect(),
            UNIX_EPOCH + Duration::from_secs(secs),
        )
        .unwrap()
    }

    #[test]
    fn target_is_first_dependency() {
        let r = record(&["Hello.ice", "Ice/Identity.ice"], 10);
        assert_eq!(r.target(), Path::new("Hello.ice"));
        assert_eq!(r.dependencies().len(), 2);
        assert_eq!(r.timestamp(), UNIX_EPOCH + Duration::from_secs(10));
    }

    #[test]
    fn empty_dependencies_rejected() {
        let err = DependencyRecord::new(Vec::new(), SystemTime::now()).unwrap_err();
        assert!(matches!(err, DependError::InvalidRecord { .. }));
    }

    #[test]
    fn insert_replaces_existing_target() {
        let mut map = DependencyMap::new();
        assert!(map.insert(record(&["a.ice", "b.ice"], 1)).is_none());
        let old = map.insert(record(&["a.ice", "c.ice"], 2)).unwrap();
        assert_eq!(old.dependencies()[1], PathBuf::from("b.ice"));
        assert_eq!(map.len(), 1);
        let current = map.get(Path::new("a.ice")).unwrap();
        assert_eq!(current.dependencies()[1], PathBuf::from("c.ice"));
    }

    #[test]
    fn sorted_orders_by_target() {
        let map: DependencyMap = [
            record(&["z.ice"], 1),
            record(&["a.ice"], 1),
            record(&["m.ice"], 1),
        ]
        .into_iter()
        .collect();
        let targets: Vec<_> = map
            .sorted()
            .into_iter()
            .map(DependencyRecord::target)
            .collect();
        assert_eq!(
            targets,
            vec![Path::new("a.ice"), Path::new("m.ice"), Path::new("z.ice")]
        );
    }

    #[test]
    fn retain_and_remove() {
        let mut map: DependencyMap = [record(&["a.ice"], 1), record(&["b.ice"], 1)]
            .into_iter()
            .collect();
        map.retain(|t| t != Path::new("a.ice"));
        assert!(!map.contains(Path::new("a.ice")));
        assert!(map.remove(Path::new("b.ice")).is_some());
        assert!(map.is_empty());
    }
}
