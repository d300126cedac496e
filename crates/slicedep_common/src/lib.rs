//! Shared foundational helpers used across the slicedep crates.
//!
//! This crate provides path normalization into the platform's canonical form
//! and the well-known names shared by the configuration and cache layers.

#![warn(missing_docs)]

pub mod path;

pub use path::{normalize, normalize_path, DEFAULT_DEPENDENCY_FILE};
