//! ESLint flat config discovery.
//!
//! Walks upward from a starting directory until a directory containing a
//! recognized config filename is found. Within one directory the filenames
//! are tried in a fixed priority order, so a `.mjs` config in the starting
//! directory still wins over a `.js` config in an ancestor.

use std::fmt;
use std::path::{Path, PathBuf};

/// Recognized flat config filenames, in priority order.
pub const CONFIG_FILENAMES: &[&str] = &[
    "eslint.config.js",
    "eslint.config.mjs",
    "eslint.config.cjs",
    "eslint.config.ts",
    "eslint.config.mts",
    "eslint.config.cts",
];

/// A located config file and the directory that contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    /// Directory containing the config file.
    pub base_path: PathBuf,
    /// Full path to the config file itself.
    pub full_path: PathBuf,
}

/// Error type for config discovery
#[derive(Debug)]
pub enum LocateError {
    /// No recognized config filename exists in the start directory or any
    /// ancestor up to the filesystem root.
    ConfigNotFound,
}

impl fmt::Display for LocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocateError::ConfigNotFound => write!(f, "No eslint config found"),
        }
    }
}

impl std::error::Error for LocateError {}

/// Find the nearest `eslint.config.*` by searching upward from `start_dir`.
///
/// The walk checks `start_dir` itself first. The first directory containing
/// at least one recognized filename terminates the walk; among the filenames
/// present there, the earliest in [`CONFIG_FILENAMES`] is selected.
pub fn locate_config(start_dir: &Path) -> Result<ConfigLocation, LocateError> {
    // Canonicalize so relative starting points can still walk to the root.
    // A nonexistent start directory cannot contain a config either way.
    let mut current = start_dir
        .canonicalize()
        .map_err(|_| LocateError::ConfigNotFound)?;

    loop {
        for filename in CONFIG_FILENAMES {
            let candidate = current.join(filename);
            if candidate.is_file() {
                return Ok(ConfigLocation {
                    base_path: current,
                    full_path: candidate,
                });
            }
        }

        if !current.pop() {
            return Err(LocateError::ConfigNotFound);
        }
    }
}
