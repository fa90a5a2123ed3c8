//! Rule metadata model and catalog aggregation.
//!
//! The catalog merges ESLint's builtin rule registry with every plugin rule
//! registry found in the effective config list, keyed plugin -> rule name.
//! Both map levels are insertion-ordered: later declarations for the same
//! `(plugin, name)` pair overwrite earlier ones without reordering, which
//! keeps fuzzy search results stable across runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resolve::ConfigEntry;

/// Aggregated rule metadata: plugin name -> rule name -> metadata.
pub type RuleCatalog = IndexMap<String, IndexMap<String, RuleMeta>>;

/// Normalized metadata for a single rule.
///
/// `plugin` is `"eslint"` for builtin rules, otherwise the prefix the plugin
/// was registered under in the config. `name` is the bare rule name without
/// the prefix. Unknown metadata keys are preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub plugin: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_suggestions: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RuleMeta {
    /// `plugin/name`, or the bare name for builtin rules.
    pub fn qualified_name(&self) -> String {
        if self.plugin == BUILTIN_PLUGIN {
            self.name.clone()
        } else {
            format!("{}/{}", self.plugin, self.name)
        }
    }

    /// Copy with `schema` and `messages` stripped, for serialized payloads.
    pub fn redacted(&self) -> RuleMeta {
        RuleMeta {
            schema: None,
            messages: None,
            ..self.clone()
        }
    }

    /// String value of a `docs` field, if present.
    pub fn doc_str(&self, key: &str) -> Option<&str> {
        self.docs.as_ref()?.get(key)?.as_str()
    }

    /// Boolean value of a `docs` field, if present.
    pub fn doc_bool(&self, key: &str) -> Option<bool> {
        self.docs.as_ref()?.get(key)?.as_bool()
    }
}

/// Plugin key that builtin rules are cataloged under.
pub const BUILTIN_PLUGIN: &str = "eslint";

/// Build the rule catalog for an effective config list.
///
/// The builtin registry is seeded first under the `eslint` plugin key, then
/// every config entry's `plugins` map is scanned in list order. Overwrite
/// policy is last-write-wins by scan order. Rules without a metadata object
/// cannot be cataloged and are skipped.
pub fn aggregate_rules(
    configs: &[ConfigEntry],
    builtin: &IndexMap<String, RuleMeta>,
) -> RuleCatalog {
    let mut catalog = RuleCatalog::new();

    let builtins = catalog.entry(BUILTIN_PLUGIN.to_string()).or_default();
    for (name, meta) in builtin {
        let mut meta = meta.clone();
        meta.name = name.clone();
        meta.plugin = BUILTIN_PLUGIN.to_string();
        builtins.insert(name.clone(), meta);
    }

    for entry in configs {
        let Some(plugins) = &entry.plugins else {
            continue;
        };
        for (prefix, plugin) in plugins {
            let bucket = catalog.entry(prefix.clone()).or_default();
            for (rule_name, rule) in &plugin.rules {
                let Some(meta) = &rule.meta else {
                    continue;
                };
                let mut meta = meta.clone();
                meta.name = rule_name.clone();
                meta.plugin = prefix.clone();
                bucket.insert(rule_name.clone(), meta);
            }
        }
    }

    catalog
}

/// Flatten a catalog to a single level keyed by qualified rule name.
///
/// Builtin rules keep their bare name; plugin rules become `prefix/name`.
/// This is the shape external wire formats expect.
pub fn flatten_rules(catalog: &RuleCatalog) -> IndexMap<String, RuleMeta> {
    let mut flat = IndexMap::new();
    for rules in catalog.values() {
        for meta in rules.values() {
            flat.insert(meta.qualified_name(), meta.clone());
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{PluginEntry, PluginRule};
    use serde_json::json;

    fn builtin_registry() -> IndexMap<String, RuleMeta> {
        let mut registry = IndexMap::new();
        registry.insert(
            "no-unused-vars".to_string(),
            RuleMeta {
                kind: Some("problem".to_string()),
                docs: Some(json!({ "description": "disallow unused variables" })),
                schema: Some(json!([])),
                ..Default::default()
            },
        );
        registry.insert(
            "no-console".to_string(),
            RuleMeta {
                kind: Some("suggestion".to_string()),
                ..Default::default()
            },
        );
        registry
    }

    fn plugin_entry(rules: &[(&str, Option<RuleMeta>)]) -> PluginEntry {
        let mut plugin = PluginEntry::default();
        for (name, meta) in rules {
            plugin
                .rules
                .insert(name.to_string(), PluginRule { meta: meta.clone() });
        }
        plugin
    }

    fn config_with_plugin(prefix: &str, plugin: PluginEntry) -> ConfigEntry {
        let mut plugins = IndexMap::new();
        plugins.insert(prefix.to_string(), plugin);
        ConfigEntry {
            plugins: Some(plugins),
            ..Default::default()
        }
    }

    #[test]
    fn test_builtins_seeded_under_eslint_key() {
        let catalog = aggregate_rules(&[], &builtin_registry());

        let builtins = catalog.get("eslint").unwrap();
        assert_eq!(builtins.len(), 2);
        let meta = builtins.get("no-unused-vars").unwrap();
        assert_eq!(meta.name, "no-unused-vars");
        assert_eq!(meta.plugin, "eslint");
        assert_eq!(meta.kind.as_deref(), Some("problem"));
        // The internal catalog keeps the schema for filtering.
        assert!(meta.schema.is_some());
    }

    #[test]
    fn test_plugin_rules_cataloged_under_prefix() {
        let meta = RuleMeta {
            kind: Some("suggestion".to_string()),
            ..Default::default()
        };
        let configs = vec![config_with_plugin(
            "@typescript-eslint",
            plugin_entry(&[("no-explicit-any", Some(meta))]),
        )];

        let catalog = aggregate_rules(&configs, &builtin_registry());

        let plugin = catalog.get("@typescript-eslint").unwrap();
        let cataloged = plugin.get("no-explicit-any").unwrap();
        assert_eq!(cataloged.plugin, "@typescript-eslint");
        assert_eq!(cataloged.name, "no-explicit-any");
    }

    #[test]
    fn test_rules_without_meta_are_skipped() {
        let configs = vec![config_with_plugin(
            "legacy",
            plugin_entry(&[("old-style", None)]),
        )];

        let catalog = aggregate_rules(&configs, &IndexMap::new());
        assert!(catalog.get("legacy").unwrap().is_empty());
    }

    #[test]
    fn test_last_write_wins_across_entries() {
        let first = RuleMeta {
            kind: Some("problem".to_string()),
            ..Default::default()
        };
        let second = RuleMeta {
            kind: Some("layout".to_string()),
            ..Default::default()
        };
        let configs = vec![
            config_with_plugin("react", plugin_entry(&[("jsx-uses-react", Some(first))])),
            config_with_plugin("react", plugin_entry(&[("jsx-uses-react", Some(second))])),
        ];

        let catalog = aggregate_rules(&configs, &IndexMap::new());
        let meta = catalog.get("react").unwrap().get("jsx-uses-react").unwrap();
        assert_eq!(meta.kind.as_deref(), Some("layout"));
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let meta = RuleMeta::default();
        let configs = vec![config_with_plugin(
            "react",
            plugin_entry(&[("jsx-key", Some(meta))]),
        )];
        let registry = builtin_registry();

        let first = aggregate_rules(&configs, &registry);
        let second = aggregate_rules(&configs, &registry);
        assert_eq!(first, second);
    }

    #[test]
    fn test_flatten_qualifies_plugin_rules_only() {
        let meta = RuleMeta::default();
        let configs = vec![config_with_plugin(
            "react",
            plugin_entry(&[("jsx-key", Some(meta))]),
        )];

        let flat = flatten_rules(&aggregate_rules(&configs, &builtin_registry()));
        assert!(flat.contains_key("no-unused-vars"));
        assert!(flat.contains_key("react/jsx-key"));
        assert!(!flat.contains_key("eslint/no-unused-vars"));
    }

    #[test]
    fn test_redacted_strips_schema_and_messages() {
        let meta = RuleMeta {
            schema: Some(json!([{ "type": "object" }])),
            messages: Some(json!({ "unused": "'{{name}}' is defined but never used." })),
            kind: Some("problem".to_string()),
            ..Default::default()
        };

        let redacted = meta.redacted();
        assert!(redacted.schema.is_none());
        assert!(redacted.messages.is_none());
        assert_eq!(redacted.kind.as_deref(), Some("problem"));
    }
}
