//! Path normalization for dependency file names.
//!
//! Dependency listings come from an external translator and may mix `/` and
//! `\` separators, repeat separators, or carry trailing ones. Every path that
//! enters a dependency record is normalized here first so lookups and
//! timestamp checks agree regardless of how the translator spelled the path.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// File name of the persisted dependency store when none is configured.
pub const DEFAULT_DEPENDENCY_FILE: &str = ".depend";

/// Returns `true` if `c` separates path components on this platform.
///
/// `/` is accepted everywhere; `\` only on Windows.
fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}

/// Normalizes a raw path string into the platform's canonical form.
///
/// Separators are rewritten to [`MAIN_SEPARATOR`], runs of separators collapse
/// into one and a trailing separator is dropped unless it denotes a root
/// (`/` or a drive root such as `C:\`). A leading double separator is kept on
/// Windows so UNC paths survive. No filesystem access is performed and `.`/`..`
/// components are left untouched.
pub fn normalize_path(raw: &str) -> PathBuf {
    let mut out = String::with_capacity(raw.len());
    let mut prev_sep = false;

    for c in raw.chars() {
        if is_separator(c) {
            let unc_prefix = cfg!(windows) && out.len() == 1;
            if prev_sep && !unc_prefix {
                continue;
            }
            out.push(MAIN_SEPARATOR);
            prev_sep = true;
        } else {
            out.push(c);
            prev_sep = false;
        }
    }

    while out.len() > 1 && out.ends_with(MAIN_SEPARATOR) && !is_drive_root(&out) {
        out.pop();
    }

    PathBuf::from(out)
}

/// Normalizes an already-typed path.
///
/// Paths that are not valid UTF-8 cannot have come from translator output and
/// are returned unchanged.
pub fn normalize(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) => normalize_path(raw),
        None => path.to_path_buf(),
    }
}

fn is_drive_root(s: &str) -> bool {
    let bytes = s.as_bytes();
    cfg!(windows) && bytes.len() == 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
