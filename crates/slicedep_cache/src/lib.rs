//! Incremental build dependency tracking for Slice translators.
//!
//! Translators emit Makefile-style dependency listings for each file they
//! compile. This crate parses those listings into [`DependencyRecord`]s,
//! persists them between build invocations, and decides from file
//! modification times whether a file must be translated again.

#![warn(missing_docs)]

pub mod error;
pub mod parser;
pub mod record;
pub mod staleness;
pub mod store;
pub mod tracker;

pub use error::DependError;
pub use parser::{parse, parse_at};
pub use record::{DependencyMap, DependencyRecord};
pub use staleness::{find_stale_item, is_up_to_date, StaleItem};
pub use store::{DependencyStore, STORE_FORMAT_VERSION};
pub use tracker::DependencyTracker;
