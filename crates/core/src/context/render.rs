//! Text block rendering for the project map.

use serde_json::{Map, Value};

use crate::error::CoreError;

use super::options::{ContextFormat, Section};

/// Render the project map in the requested format.
pub(crate) fn render_text_block(
    project: &Map<String, Value>,
    format: ContextFormat,
) -> Result<String, CoreError> {
    match format {
        ContextFormat::Json => serde_json::to_string_pretty(project)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize project context: {e}"))),
        ContextFormat::LabeledSections => Ok(render_labeled(project)),
    }
}

/// One `Label: value` line per key, in map order.
///
/// The project name is labeled `Project`, sections use their heading and
/// carry compact JSON, plain string lists are joined with `, `.
fn render_labeled(project: &Map<String, Value>) -> String {
    project
        .iter()
        .map(|(key, value)| {
            let label = match Section::parse(key) {
                Some(section) => section.label().to_string(),
                None if key == "name" => "Project".to_string(),
                None => humanize_key(key),
            };
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Array(items) if items.iter().all(Value::is_string) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
                other => other.to_string(),
            };
            format!("{label}: {rendered}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `core_premise` -> `Core Premise`.
pub(crate) fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
