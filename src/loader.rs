//! Config module loading boundary.
//!
//! The core only needs one capability from a loader: execute an on-disk
//! module and hand back its exported value plus the files it read. The
//! [`ConfigLoader`] trait keeps that mechanism swappable; [`NodeLoader`]
//! implements it by bridging to the Node.js runtime the config was written
//! for, with an embedded bootstrap script that prints a JSON snapshot.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};

use crate::rules::RuleMeta;

const BOOTSTRAP: &str = include_str!("bootstrap.mjs");

/// A loaded config module: its resolved export as a JSON snapshot, plus the
/// files the load depended on.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub value: Value,
    pub dependencies: Vec<PathBuf>,
}

/// Error type for config module loading
#[derive(Debug)]
pub enum LoadError {
    /// The loader process could not be started.
    Spawn(io::Error),
    /// The loader process ran but failed; carries its stderr.
    Node { status: Option<i32>, stderr: String },
    /// The loader's output was not the expected JSON shape.
    Parse(serde_json::Error),
    /// Filesystem error while entering the config directory.
    Io(io::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Spawn(e) => write!(f, "failed to run node: {e}"),
            LoadError::Node { status, stderr } => {
                let status = status
                    .map(|code| code.to_string())
                    .unwrap_or_else(|| "terminated".to_string());
                write!(f, "config module evaluation failed (node exit {status}): {stderr}")
            }
            LoadError::Parse(e) => write!(f, "failed to parse loader output: {e}"),
            LoadError::Io(e) => write!(f, "failed to enter config directory: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Spawn(e) | LoadError::Io(e) => Some(e),
            LoadError::Node { .. } => None,
            LoadError::Parse(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Parse(e)
    }
}

/// Executes a config module and exposes the host linter's builtin registry.
///
/// Implementations must evaluate the file as a module (at least the
/// extensions recognized by the locator), resolve `default ?? module` and
/// await it, and report the builtin registry resolved relative to the
/// config's directory before any global fallback.
pub trait ConfigLoader {
    fn load(&self, base_path: &Path, config_path: &Path) -> Result<LoadedConfig, LoadError>;

    fn builtin_rules(&self, base_path: &Path) -> Result<IndexMap<String, RuleMeta>, LoadError>;
}

/// Loads config modules by spawning a `node` child process.
///
/// The child inherits the parent's working directory, so callers pin it to
/// the config's directory first (see `scoped::run_in_directory`). The config
/// module's own console output arrives on the child's stderr and is
/// forwarded through `tracing` at info level, where the silent-output
/// wrapper can drop it.
pub struct NodeLoader {
    program: String,
}

impl NodeLoader {
    pub fn new() -> Self {
        Self {
            program: "node".to_string(),
        }
    }

    /// Use a specific runtime executable instead of `node` from `PATH`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run_bootstrap(&self, mode: &str, target: &Path) -> Result<Value, LoadError> {
        debug!("running {} bridge for {}", mode, target.display());
        let output = Command::new(&self.program)
            .arg("--input-type=module")
            .arg("-e")
            .arg(BOOTSTRAP)
            .arg(mode)
            .arg(target)
            .stdin(Stdio::null())
            .output()
            .map_err(LoadError::Spawn)?;

        forward_child_logs(&output.stderr);

        if !output.status.success() {
            return Err(LoadError::Node {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

impl Default for NodeLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader for NodeLoader {
    fn load(&self, _base_path: &Path, config_path: &Path) -> Result<LoadedConfig, LoadError> {
        let value = self.run_bootstrap("config", config_path)?;
        Ok(LoadedConfig {
            value,
            dependencies: vec![config_path.to_path_buf()],
        })
    }

    fn builtin_rules(&self, base_path: &Path) -> Result<IndexMap<String, RuleMeta>, LoadError> {
        let value = self.run_bootstrap("builtins", base_path)?;
        Ok(serde_json::from_value(value)?)
    }
}

fn forward_child_logs(stderr: &[u8]) {
    for line in String::from_utf8_lossy(stderr).lines() {
        if !line.trim().is_empty() {
            info!(target: "ruleq::loader", "{line}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_runtime_is_a_spawn_error() {
        let loader = NodeLoader::with_program("definitely-not-a-real-node-binary");
        let result = loader.load(Path::new("."), Path::new("eslint.config.js"));
        assert!(matches!(result, Err(LoadError::Spawn(_))));
    }

    #[test]
    fn test_node_failure_carries_stderr() {
        let err = LoadError::Node {
            status: Some(1),
            stderr: "Cannot find package 'eslint'".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("node exit 1"));
        assert!(message.contains("Cannot find package 'eslint'"));
    }
}
