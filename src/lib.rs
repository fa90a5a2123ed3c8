//! ruleq core library.
//!
//! Resolves a project's ESLint flat config and answers rule metadata
//! queries against it.
//!
//! High-level modules:
//! - `locate`: Upward discovery of `eslint.config.*` files.
//! - `scoped`: Working-directory pinning and log silencing around the load.
//! - `loader`: The config-module loading boundary and its Node.js bridge.
//! - `resolve`: Default-fragment merging, catalog aggregation, payload.
//! - `rules`: Rule metadata model and the plugin/builtin aggregator.
//! - `search`: Exact and fuzzy rule lookup with plugin scoping.
//! - `output`: Human-readable rendering of rule metadata.
//! - `colors`/`progress`: Terminal presentation support (binary uses these).

pub mod colors;
pub mod loader;
pub mod locate;
pub mod output;
pub mod progress;
pub mod resolve;
pub mod rules;
pub mod scoped;
pub mod search;

pub use colors::{should_use_colors, Colors};
pub use loader::{ConfigLoader, LoadError, LoadedConfig, NodeLoader};
pub use locate::{locate_config, ConfigLocation, LocateError, CONFIG_FILENAMES};
pub use output::format_rule;
pub use progress::Spinner;
pub use resolve::{
    normalize_config, resolve, resolve_with, ConfigEntry, Payload, PayloadMeta, PluginEntry,
    PluginRule, ResolveOptions, ResolvedConfig,
};
pub use rules::{aggregate_rules, flatten_rules, RuleCatalog, RuleMeta, BUILTIN_PLUGIN};
pub use scoped::{run_in_directory, run_silently};
pub use search::{
    search_rules, RuleFilter, RuleQuery, SearchError, SearchMatch, SearchResult, SearchStrategy,
};

use std::fmt;
use std::path::PathBuf;

/// Any failure surfaced by the composed entry points.
#[derive(Debug)]
pub enum Error {
    Locate(LocateError),
    Load(LoadError),
    Search(SearchError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Locate(e) => e.fmt(f),
            Error::Load(e) => e.fmt(f),
            Error::Search(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Locate(e) => Some(e),
            Error::Load(e) => Some(e),
            Error::Search(e) => Some(e),
        }
    }
}

impl From<LocateError> for Error {
    fn from(e: LocateError) -> Self {
        Error::Locate(e)
    }
}

impl From<LoadError> for Error {
    fn from(e: LoadError) -> Self {
        Error::Load(e)
    }
}

impl From<SearchError> for Error {
    fn from(e: SearchError) -> Self {
        Error::Search(e)
    }
}

/// Options for [`search_rule`].
#[derive(Default)]
pub struct SearchOptions<'a> {
    /// Project root to resolve the config from. Defaults to the current
    /// working directory.
    pub root_dir: Option<PathBuf>,
    pub strategy: SearchStrategy,
    /// Suppress console output during config resolution; useful when the
    /// result feeds a JSON pipeline.
    pub suppress_output: bool,
    /// Keep only rules this predicate accepts.
    pub filter: Option<&'a RuleFilter>,
}

/// Resolve the project's config and search its rule catalog.
///
/// Composes [`resolve`] and [`search_rules`]; see those for the individual
/// failure modes. A query that matches nothing is an empty `Vec`, not an
/// error.
pub fn search_rule(rule_name: &str, options: SearchOptions) -> Result<Vec<SearchMatch>, Error> {
    let root = options
        .root_dir
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let resolved = resolve(
        &root,
        &ResolveOptions {
            suppress_output: options.suppress_output,
        },
    )?;

    let result = search_rules(&resolved.rules, rule_name, options.strategy, options.filter)?;
    Ok(result.rules)
}
