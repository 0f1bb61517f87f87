use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DescriptorFormat, MetadataError, looks_like_json, top_level_list, top_level_value};
use crate::syntax::parse_lines;

const DEPENDENCY_RELATIONSHIP: &str = "dependency";

/// A mod's own descriptor (`descriptor.mod`, `<name>.mod` or
/// `.metadata/metadata.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModDescriptor {
    pub name: String,
    pub path: Option<String>,
    pub archive: Option<String>,
    pub version: Option<String>,
    pub supported_version: Option<String>,
    pub tags: Vec<String>,
    /// Names of mods this one must load after.
    pub dependencies: Vec<String>,
    pub remote_id: Option<String>,
    pub picture: Option<String>,
    pub replace_paths: Vec<String>,
    pub format: DescriptorFormat,
}

pub fn parse_mod_descriptor<S: AsRef<str>>(lines: &[S]) -> Result<ModDescriptor, MetadataError> {
    if looks_like_json(lines) {
        let text = lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n");
        let json: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;
        return parse_json(&json);
    }

    let document = parse_lines(lines)?;
    let name = top_level_value(&document, "name").ok_or(MetadataError::MissingName)?;
    Ok(ModDescriptor {
        name,
        path: top_level_value(&document, "path"),
        archive: top_level_value(&document, "archive"),
        version: top_level_value(&document, "version"),
        supported_version: top_level_value(&document, "supported_version"),
        tags: top_level_list(&document, "tags"),
        dependencies: top_level_list(&document, "dependencies"),
        remote_id: top_level_value(&document, "remote_file_id"),
        picture: top_level_value(&document, "picture"),
        replace_paths: top_level_list(&document, "replace_path"),
        format: DescriptorFormat::Native,
    })
}

fn parse_json(json: &Value) -> Result<ModDescriptor, MetadataError> {
    let name = string_field(json, "name").ok_or(MetadataError::MissingName)?;
    let dependencies = json
        .get("relationships")
        .and_then(Value::as_array)
        .map(|relationships| {
            relationships
                .iter()
                .filter(|rel| {
                    rel.get("rel_type").and_then(Value::as_str).is_none_or(|t| t == DEPENDENCY_RELATIONSHIP)
                })
                .filter_map(|rel| string_field(rel, "display_name").or_else(|| string_field(rel, "id")))
                .collect()
        })
        .unwrap_or_default();
    let replace_paths = json
        .get("game_custom_data")
        .and_then(|data| data.get("replace_paths"))
        .map(string_array)
        .unwrap_or_default();

    Ok(ModDescriptor {
        name,
        path: None,
        archive: None,
        version: string_field(json, "version"),
        supported_version: string_field(json, "supported_game_version"),
        tags: json.get("tags").map(string_array).unwrap_or_default(),
        dependencies,
        remote_id: string_field(json, "id"),
        picture: string_field(json, "picture"),
        replace_paths,
        format: DescriptorFormat::JsonV2,
    })
}

fn string_field(
    value: &Value,
    key: &str,
) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn string_array(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}
