//! Configuration types deserialized from `slicedep.toml`.

use serde::Deserialize;
use slicedep_common::DEFAULT_DEPENDENCY_FILE;
use std::path::{Path, PathBuf};

/// The top-level configuration parsed from `slicedep.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SliceDepConfig {
    /// Dependency tracker settings.
    #[serde(default)]
    pub tracker: TrackerConfig,
}

/// Settings for the incremental dependency tracker.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TrackerConfig {
    /// Directory the translator writes generated code into.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Explicit location of the persisted dependency store.
    #[serde(default)]
    pub dependency_file: Option<PathBuf>,
    /// Evaluate staleness of independent targets on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

impl TrackerConfig {
    /// Creates a configuration that stores dependencies inside `output_dir`.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: Some(output_dir.into()),
            ..Self::default()
        }
    }

    /// Resolves where the dependency store lives.
    ///
    /// An explicit `dependency_file` wins. Otherwise the store is
    /// `.depend` inside `output_dir`, or `.depend` in the current working
    /// directory when no output directory is configured.
    pub fn dependency_file_path(&self) -> PathBuf {
        if let Some(file) = &self.dependency_file {
            return file.clone();
        }
        match &self.output_dir {
            Some(dir) => dir.join(DEFAULT_DEPENDENCY_FILE),
            None => PathBuf::from(DEFAULT_DEPENDENCY_FILE),
        }
    }

    /// Rebases relative paths onto `base`.
    ///
    /// Used when the configuration was read from a file so that relative
    /// entries refer to the directory holding that file.
    pub fn rebase(mut self, base: &Path) -> Self {
        self.output_dir = self.output_dir.map(|p| base.join(p));
        self.dependency_file = self.dependency_file.map(|p| base.join(p));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_is_in_working_directory() {
        let config = TrackerConfig::default();
        assert_eq!(config.dependency_file_path(), PathBuf::from(".depend"));
    }

    #[test]
    fn default_store_is_inside_output_dir() {
        let config = TrackerConfig::with_output_dir("generated");
        assert_eq!(
            config.dependency_file_path(),
            PathBuf::from("generated").join(".depend")
        );
    }

    #[test]
    fn explicit_dependency_file_wins() {
        let config = TrackerConfig {
            output_dir: Some(PathBuf::from("generated")),
            dependency_file: Some(PathBuf::from("build/slice.deps")),
            parallel: false,
        };
        assert_eq!(
            config.dependency_file_path(),
            PathBuf::from("build/slice.deps")
        );
    }

    #[test]
    fn rebase_joins_relative_entries() {
        let config = TrackerConfig::with_output_dir("generated").rebase(Path::new("/project"));
        assert_eq!(config.output_dir, Some(PathBuf::from("/project/generated")));
        assert!(config.dependency_file.is_none());
    }

    #[test]
    fn rebase_keeps_absolute_entries() {
        let config = TrackerConfig {
            dependency_file: Some(PathBuf::from("/var/cache/.depend")),
            ..TrackerConfig::default()
        }
        .rebase(Path::new("/project"));
        assert_eq!(
            config.dependency_file,
            Some(PathBuf::from("/var/cache/.depend"))
        );
    }
}
