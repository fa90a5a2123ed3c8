//! Rule lookup over an aggregated catalog.
//!
//! Queries are plugin-scoped: a bare name searches builtin rules, a
//! `plugin/name` form searches that plugin's rules. An unknown plugin prefix
//! is an empty result, not an error; a malformed query is an error.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::rules::{RuleCatalog, RuleMeta, BUILTIN_PLUGIN};

/// Predicate applied to matched rules before they are returned.
pub type RuleFilter = dyn Fn(&RuleMeta) -> bool;

/// How a query string is matched against cataloged rule names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStrategy {
    /// Match the rule name exactly.
    Exact,
    /// Case-insensitive substring match.
    #[default]
    Includes,
}

impl FromStr for SearchStrategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(SearchStrategy::Exact),
            "includes" => Ok(SearchStrategy::Includes),
            other => Err(SearchError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Error type for rule queries
#[derive(Debug)]
pub enum SearchError {
    /// The query contained more than one `/`.
    InvalidRuleName(String),
    /// A strategy string the engine does not know. Programmer error, never
    /// folded into an empty result.
    UnknownStrategy(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidRuleName(input) => {
                write!(f, "Invalid rule name format: {input}")
            }
            SearchError::UnknownStrategy(input) => {
                write!(f, "Unknown search strategy: {input}")
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// A parsed rule query: plugin prefix plus bare rule name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleQuery {
    pub plugin: String,
    pub name: String,
}

impl RuleQuery {
    /// Parse a query string.
    ///
    /// `"no-unused-vars"` scopes to the builtin `eslint` plugin;
    /// `"@typescript-eslint/no-explicit-any"` scopes to that plugin.
    pub fn parse(input: &str) -> Result<Self, SearchError> {
        let parts: Vec<&str> = input.split('/').collect();
        match parts.as_slice() {
            [name] => Ok(Self {
                plugin: BUILTIN_PLUGIN.to_string(),
                name: (*name).to_string(),
            }),
            [plugin, name] => Ok(Self {
                plugin: (*plugin).to_string(),
                name: (*name).to_string(),
            }),
            _ => Err(SearchError::InvalidRuleName(input.to_string())),
        }
    }

    /// Canonical `plugin/name` form.
    pub fn qualified(&self) -> String {
        format!("{}/{}", self.plugin, self.name)
    }
}

/// One matched rule: its qualified name and metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMatch {
    pub name: String,
    pub info: RuleMeta,
}

/// Outcome of a catalog search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub found: bool,
    pub rules: Vec<SearchMatch>,
}

impl SearchResult {
    fn not_found() -> Self {
        Self {
            found: false,
            rules: Vec::new(),
        }
    }
}

/// Search the catalog for rules matching `rule_name`.
///
/// Fuzzy results keep the catalog's insertion order. The filter predicate,
/// when given, removes matches whose metadata it rejects; `found` reflects
/// the final list.
pub fn search_rules(
    catalog: &RuleCatalog,
    rule_name: &str,
    strategy: SearchStrategy,
    filter: Option<&RuleFilter>,
) -> Result<SearchResult, SearchError> {
    let query = RuleQuery::parse(rule_name)?;

    let Some(plugin_rules) = catalog.get(&query.plugin) else {
        return Ok(SearchResult::not_found());
    };

    let mut matches: Vec<SearchMatch> = match strategy {
        SearchStrategy::Exact => plugin_rules
            .get(&query.name)
            .map(|meta| {
                vec![SearchMatch {
                    name: query.qualified(),
                    info: meta.clone(),
                }]
            })
            .unwrap_or_default(),
        SearchStrategy::Includes => {
            let needle = query.name.to_lowercase();
            plugin_rules
                .iter()
                .filter(|(name, _)| name.to_lowercase().contains(&needle))
                .map(|(name, meta)| SearchMatch {
                    name: format!("{}/{}", query.plugin, name),
                    info: meta.clone(),
                })
                .collect()
        }
    };

    if let Some(filter) = filter {
        matches.retain(|m| filter(&m.info));
    }

    Ok(SearchResult {
        found: !matches.is_empty(),
        rules: matches,
    })
}
