//! DLC and mod descriptor parsing.
//!
//! Descriptors come in the native `key = value` script syntax or as JSON.
//! Both are reduced to the same typed records.

mod descriptor;
mod dlc;

pub use descriptor::{ModDescriptor, parse_mod_descriptor};
pub use dlc::{DlcMetadata, parse_dlc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::syntax::{ParseError, ScriptDocument, ScriptElement, unquote};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("invalid descriptor syntax: {0}")]
    Syntax(#[from] ParseError),

    #[error("invalid JSON descriptor: {0}")]
    Json(#[from] serde_json::Error),

    #[error("descriptor has no name")]
    MissingName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescriptorFormat {
    Native,
    JsonV1,
    JsonV2,
}

fn looks_like_json<S: AsRef<str>>(lines: &[S]) -> bool {
    lines
        .iter()
        .map(|line| line.as_ref().trim_start_matches('\u{feff}').trim())
        .find(|line| !line.is_empty())
        .is_some_and(|line| line.starts_with('{'))
}

/// Unquoted value of the first top-level `key = value`.
fn top_level_value(
    document: &ScriptDocument,
    key: &str,
) -> Option<String> {
    document
        .elements
        .iter()
        .filter(|element| element.has_key(key))
        .find_map(ScriptElement::as_value)
        .map(|value| unquote(&value.value).to_string())
}

/// Every value given for `key`: bare members of `key = { ... }` blocks and
/// repeated `key = value` statements.
fn top_level_list(
    document: &ScriptDocument,
    key: &str,
) -> Vec<String> {
    let mut out = Vec::new();
    for element in document.elements.iter().filter(|element| element.has_key(key)) {
        match element {
            ScriptElement::Node(node) => out.extend(node.bare_values()),
            ScriptElement::Value(value) => out.push(unquote(&value.value).to_string()),
        }
    }
    out
}

fn is_affirmative(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "yes" | "true" | "1")
}

#[cfg(test)]
#[path = "../../tests/src/metadata_tests.rs"]
mod tests;
