//! Error types for dependency tracking.

use std::path::PathBuf;

/// Errors that can occur while parsing, loading, or saving dependencies.
///
/// Load failures are recovered by [`DependencyStore::load`](crate::DependencyStore::load)
/// as an empty store; parse and save failures are meant to abort the current
/// build step.
#[derive(Debug, thiserror::Error)]
pub enum DependError {
    /// Translator output did not have the expected `target: deps...` shape.
    #[error("malformed dependency text at line {line}: {reason}: `{text}`")]
    MalformedDependencyText {
        /// 1-based line number where the offending rule starts.
        line: usize,
        /// The logical (continuation-joined) rule text.
        text: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The dependency store could not be read.
    #[error("cannot read dependency store {path}: {source}")]
    StoreUnreadable {
        /// Location of the store.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The dependency store exists but its contents could not be decoded.
    #[error("corrupt dependency store {path}: {reason}")]
    StoreCorrupt {
        /// Location of the store.
        path: PathBuf,
        /// Description of the decoding failure.
        reason: String,
    },

    /// The dependency store was written in a format this version does not read.
    #[error("dependency store {path} has format version {actual}, expected {expected}")]
    StoreVersionMismatch {
        /// Location of the store.
        path: PathBuf,
        /// The format version this build reads and writes.
        expected: u32,
        /// The format version found in the file.
        actual: u32,
    },

    /// The dependency store could not be written.
    #[error("unable to write dependencies in file {path}: {source}")]
    StoreUnwritable {
        /// Location of the store.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The in-memory dependencies could not be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// A record was constructed without any dependencies.
    #[error("invalid dependency record: {reason}")]
    InvalidRecord {
        /// Why the record was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_includes_context() {
        let err = DependError::MalformedDependencyText {
            line: 3,
            text: "Hello.ice Other.ice".to_string(),
            reason: "first file is not followed by ':'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("Hello.ice Other.ice"));
    }

    #[test]
    fn unwritable_display_names_file() {
        let err = DependError::StoreUnwritable {
            path: PathBuf::from("generated/.depend"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("unable to write dependencies"));
        assert!(msg.contains(".depend"));
    }

    #[test]
    fn version_mismatch_display() {
        let err = DependError::StoreVersionMismatch {
            path: PathBuf::from(".depend"),
            expected: 1,
            actual: 7,
        };
        let msg = err.to_string();
        assert!(msg.contains("format version 7"));
        assert!(msg.contains("expected 1"));
    }

    #[test]
    fn corrupt_display() {
        let err = DependError::StoreCorrupt {
            path: PathBuf::from(".depend"),
            reason: "EOF while parsing".to_string(),
        };
        assert!(err.to_string().contains("EOF while parsing"));
    }
}
