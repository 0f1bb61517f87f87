use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DescriptorFormat, MetadataError, is_affirmative, looks_like_json, top_level_value};
use crate::{
    definition::normalize_path,
    syntax::{find_value, parse_lines},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DlcMetadata {
    pub name: String,
    /// Mod-relative path with `\` separators.
    pub path: String,
    pub app_id: Option<String>,
    pub is_visible: bool,
    pub format: DescriptorFormat,
}

/// Parses a DLC descriptor found at `path`.
///
/// The native and JSON v2 forms take their path from `path` itself; the
/// older JSON form carries its own `path` field.
pub fn parse_dlc<S: AsRef<str>>(
    path: &str,
    lines: &[S],
) -> Result<DlcMetadata, MetadataError> {
    if looks_like_json(lines) {
        let text = lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n");
        let json: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;
        return parse_json(path, &json);
    }
    parse_native(path, lines)
}

fn parse_native<S: AsRef<str>>(
    path: &str,
    lines: &[S],
) -> Result<DlcMetadata, MetadataError> {
    let document = parse_lines(lines)?;
    let name = top_level_value(&document, "name").ok_or(MetadataError::MissingName)?;
    let app_id = document
        .find_node("id")
        .and_then(|id| id.value_of("steam"))
        .or_else(|| top_level_value(&document, "steam_id"))
        .or_else(|| find_value(&document, "steam"));
    let hidden = top_level_value(&document, "hidden").is_some_and(|v| is_affirmative(&v));
    let disabled = top_level_value(&document, "enabled").is_some_and(|v| !is_affirmative(&v));

    Ok(DlcMetadata {
        name,
        path: normalize_path(path),
        app_id,
        is_visible: !(hidden || disabled),
        format: DescriptorFormat::Native,
    })
}

fn parse_json(
    path: &str,
    json: &Value,
) -> Result<DlcMetadata, MetadataError> {
    let (format, name, path) = match json.get("displayName").and_then(Value::as_str) {
        Some(display_name) => {
            let own_path = json.get("path").and_then(Value::as_str).map(normalize_path).unwrap_or_default();
            (DescriptorFormat::JsonV1, display_name.to_string(), own_path)
        },
        None => {
            let name = json.get("name").and_then(Value::as_str).ok_or(MetadataError::MissingName)?;
            (DescriptorFormat::JsonV2, name.to_string(), normalize_path(path))
        },
    };

    let app_id = json
        .get("id")
        .and_then(|id| id.get("steam"))
        .or_else(|| json.get("steamId"))
        .and_then(json_scalar);
    let hidden = json.get("hidden").and_then(Value::as_bool).unwrap_or(false);
    let enabled = json.get("enabled").and_then(Value::as_bool).unwrap_or(true);

    Ok(DlcMetadata {
        name,
        path,
        app_id,
        is_visible: !hidden && enabled,
        format,
    })
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
