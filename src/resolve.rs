//! Flat config resolution.
//!
//! Locates the nearest config file, runs it through the loader with the
//! working directory pinned to the config's own directory, prepends ESLint's
//! implicit default config fragments, aggregates the rule catalog, and
//! builds the serializable payload projection.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::loader::{ConfigLoader, LoadError, LoadedConfig, NodeLoader};
use crate::locate::{locate_config, ConfigLocation};
use crate::rules::{aggregate_rules, RuleCatalog, RuleMeta};
use crate::scoped::{run_in_directory, run_silently};
use crate::Error;

/// One configuration object from the loaded module's export.
///
/// Known fields are typed; everything else the config author wrote is kept
/// verbatim in `extra` so payload serialization round-trips it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    /// Position in the effective list. Only set on payload projections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignores: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_options: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linter_options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<IndexMap<String, PluginEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A plugin as snapshotted by the loader: its exposed rule registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginEntry {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub rules: IndexMap<String, PluginRule>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One rule slot in a plugin registry; `meta` is absent for legacy rules
/// that declare no metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginRule {
    pub meta: Option<RuleMeta>,
}

/// The four default config fragments ESLint applies ahead of user entries.
///
/// Order is load-bearing: downstream file matching treats later entries as
/// overrides, and these must occupy indices 0-3 exactly as the linter's own
/// runtime prepends them.
fn default_config_entries() -> Vec<ConfigEntry> {
    let defaults = json!([
        {
            "name": "eslint/defaults/languages",
            "languageOptions": {
                "ecmaVersion": "latest",
                "sourceType": "module",
                "parserOptions": {}
            },
            "linterOptions": { "reportUnusedDisableDirectives": 1 }
        },
        {
            "name": "eslint/defaults/ignores",
            "ignores": ["**/node_modules/", ".git/"]
        },
        {
            "name": "eslint/defaults/files",
            "files": ["**/*.js", "**/*.mjs"]
        },
        {
            "name": "eslint/defaults/files-cjs",
            "files": ["**/*.cjs"],
            "languageOptions": { "ecmaVersion": "latest", "sourceType": "commonjs" }
        }
    ]);
    serde_json::from_value(defaults).expect("default config fragments are well-formed")
}

/// Coerce a loaded export into the effective config list.
///
/// A single object becomes a one-element list; the default fragments are
/// prepended ahead of the user's entries, which keep their relative order.
pub fn normalize_config(raw: Value) -> Result<Vec<ConfigEntry>, LoadError> {
    let user: Vec<ConfigEntry> = match raw {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<_, _>>()?,
        other => vec![serde_json::from_value(other)?],
    };

    let mut configs = default_config_entries();
    configs.extend(user);
    Ok(configs)
}

/// Serializable projection of a resolution, safe to ship over IPC/JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub configs: Vec<ConfigEntry>,
    pub files: Option<Value>,
    pub meta: PayloadMeta,
    pub rules: RuleCatalog,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMeta {
    pub base_path: PathBuf,
    pub config_path: PathBuf,
    pub last_update: u64,
}

/// Options for [`resolve`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Route the load through the silent-output wrapper, dropping
    /// info-level logging (including the config module's own chatter).
    pub suppress_output: bool,
}

/// A fully resolved config: the effective entry list, the load's file
/// dependencies, the internal rule catalog (metadata intact, for search and
/// filtering), and the redacted payload projection.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub configs: Vec<ConfigEntry>,
    pub dependencies: Vec<PathBuf>,
    pub rules: RuleCatalog,
    pub payload: Payload,
}

/// Resolve the effective flat config for `root_dir` using the Node bridge.
pub fn resolve(root_dir: &Path, options: &ResolveOptions) -> Result<ResolvedConfig, Error> {
    resolve_with(root_dir, &NodeLoader::new(), options)
}

/// Resolve with a caller-supplied loader implementation.
pub fn resolve_with(
    root_dir: &Path,
    loader: &dyn ConfigLoader,
    options: &ResolveOptions,
) -> Result<ResolvedConfig, Error> {
    let location = locate_config(root_dir)?;
    debug!("resolved config file: {}", location.full_path.display());

    let load = || -> Result<(LoadedConfig, IndexMap<String, RuleMeta>), Error> {
        // The config module may read paths relative to its own directory,
        // and the spawned child inherits our working directory.
        let loaded = run_in_directory(&location.base_path, || {
            loader.load(&location.base_path, &location.full_path)
        })
        .map_err(LoadError::Io)??;
        let builtins = loader.builtin_rules(&location.base_path)?;
        Ok((loaded, builtins))
    };

    let (loaded, builtins) = if options.suppress_output {
        run_silently(load)?
    } else {
        load()?
    };

    let configs = normalize_config(loaded.value).map_err(Error::Load)?;
    let catalog = aggregate_rules(&configs, &builtins);
    let payload = build_payload(&configs, &catalog, &location);

    Ok(ResolvedConfig {
        configs,
        dependencies: loaded.dependencies,
        rules: catalog,
        payload,
    })
}

fn build_payload(
    configs: &[ConfigEntry],
    catalog: &RuleCatalog,
    location: &ConfigLocation,
) -> Payload {
    let redacted_configs = configs
        .iter()
        .enumerate()
        .map(|(index, entry)| redact_entry(entry.clone(), index))
        .collect();

    let redacted_rules = catalog
        .iter()
        .map(|(plugin, rules)| {
            let rules = rules
                .iter()
                .map(|(name, meta)| (name.clone(), meta.redacted()))
                .collect();
            (plugin.clone(), rules)
        })
        .collect();

    Payload {
        configs: redacted_configs,
        files: None,
        meta: PayloadMeta {
            base_path: location.base_path.clone(),
            config_path: location.full_path.clone(),
            last_update: unix_millis(),
        },
        rules: redacted_rules,
    }
}

/// Strip the non-serializable references out of one entry and attach its
/// position: parser and processor collapse to their declared names, plugin
/// objects become empty placeholders.
fn redact_entry(mut entry: ConfigEntry, index: usize) -> ConfigEntry {
    entry.index = Some(index);

    if let Some(options) = entry.language_options.as_mut() {
        if let Some(parser) = options.get_mut("parser") {
            if let Some(name) = parser.get("name") {
                *parser = name.clone();
            }
        }
    }

    if let Some(plugins) = entry.plugins.as_mut() {
        for plugin in plugins.values_mut() {
            *plugin = PluginEntry::default();
        }
    }

    if let Some(processor) = entry.processor.as_mut() {
        if let Some(name) = processor.get("name") {
            *processor = name.clone();
        }
    }

    entry
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
