//! Terminal rendering of rule metadata.

use crate::colors::Colors;
use crate::rules::RuleMeta;
use serde_json::Value;

/// Render one rule's metadata as a multi-line block.
pub fn format_rule(info: &RuleMeta, colors: &Colors) -> String {
    let mut lines: Vec<String> = Vec::new();

    let mut rule_name = info.name.clone();
    if !info.plugin.is_empty() && info.plugin != "eslint" {
        rule_name.push_str(&format!(" ({})", info.plugin));
    }
    lines.push(format!(
        "📌 {}Rule: {}{}",
        colors.heading,
        rule_name,
        colors.reset()
    ));

    if let Some(line) = deprecation_line(info, colors) {
        lines.push(line);
        lines.push(String::new());
    }

    if let Some(description) = info.doc_str("description") {
        lines.push(format!("📝 {description}"));
    }

    lines.extend(metadata_section(info, colors));
    lines.extend(configuration_section(info));
    lines.extend(documentation_section(info));

    lines.join("\n")
}

fn deprecation_line(info: &RuleMeta, colors: &Colors) -> Option<String> {
    let deprecated = info.deprecated.as_ref()?;
    if matches!(deprecated, Value::Bool(false) | Value::Null) {
        return None;
    }

    let mut line = format!("{}📋 DEPRECATED{}", colors.warning, colors.reset());
    if let Some(reason) = deprecated.get("reason").and_then(Value::as_str) {
        line.push_str(&format!(": {reason}"));
    }
    Some(line)
}

fn metadata_section(info: &RuleMeta, colors: &Colors) -> Vec<String> {
    let mut lines = vec![format!("\n{}🔧 METADATA{}", colors.heading, colors.reset())];

    if let Some(kind) = info.kind.as_deref() {
        let emoji = match kind {
            "problem" => "🚨 ",
            "suggestion" => "💡 ",
            "layout" => "🎨 ",
            _ => "",
        };
        lines.push(format!("  • Type: {emoji}{kind}"));
    }

    if let Some(category) = info.doc_str("category") {
        lines.push(format!("  • Category: {category}"));
    }

    if let Some(recommended) = info.doc_bool("recommended") {
        let marker = if recommended { "✅ Yes" } else { "❌ No" };
        lines.push(format!("  • Recommended: {marker}"));
    }

    if let Some(fixable) = info.fixable.as_deref() {
        lines.push(format!(
            "  • Fixable: {}✅ {fixable}{}",
            colors.success,
            colors.reset()
        ));
    }

    if info.has_suggestions == Some(true) {
        lines.push("  • Suggestions: 💭 Available".to_string());
    }

    if info.doc_bool("requiresTypeChecking") == Some(true) {
        lines.push("  • TypeScript: ⚡ Required".to_string());
    }

    lines
}

fn configuration_section(info: &RuleMeta) -> Vec<String> {
    let Some(schema) = info.schema.as_ref() else {
        return Vec::new();
    };
    if schema.is_null() {
        return Vec::new();
    }

    let options = match schema {
        Value::Array(params) => format!("{} parameter(s)", params.len()),
        _ => "configurable".to_string(),
    };
    vec!["\n⚙️  CONFIGURATION".to_string(), format!("  • Options: {options}")]
}

fn documentation_section(info: &RuleMeta) -> Vec<String> {
    match info.doc_str("url") {
        Some(url) => vec![
            "\n📖 DOCUMENTATION".to_string(),
            format!("  • URL: {url}"),
        ],
        None => Vec::new(),
    }
}
