//! Canonical re-emission of recognized script structure.
//!
//! Output contract: 4-space indentation per nesting level, LF line endings,
//! one statement per line, no tabs, no comments, and decimal literals
//! without insignificant trailing zeros. Formatting already-canonical text
//! yields the same bytes.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::syntax::{
    parser::{ParseError, parse_lines, parse_text},
    tree::{ScriptDocument, ScriptElement, ScriptNode, ScriptValue},
};

pub const INDENT: &str = "    ";

static DECIMAL_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([-+]?\d+)\.(\d+)$").expect("valid decimal regex"));

/// Parses and canonicalizes a script text.
pub fn format_code(text: &str) -> Result<String, ParseError> {
    let document = parse_text(text)?;
    Ok(format_document(&document))
}

/// Parses and canonicalizes a sequence of physical lines.
pub fn format_lines<S: AsRef<str>>(lines: &[S]) -> Result<String, ParseError> {
    let document = parse_lines(lines)?;
    Ok(format_document(&document))
}

pub fn format_document(document: &ScriptDocument) -> String {
    format_elements(&document.elements, 0)
}

pub fn format_elements(
    elements: &[ScriptElement],
    depth: usize,
) -> String {
    let mut out = String::new();
    for element in elements {
        if !out.is_empty() {
            out.push('\n');
        }
        write_element(&mut out, element, depth);
    }
    out
}

pub fn format_element(
    element: &ScriptElement,
    depth: usize,
) -> String {
    let mut out = String::new();
    write_element(&mut out, element, depth);
    out
}

pub fn format_node(
    node: &ScriptNode,
    depth: usize,
) -> String {
    let mut out = String::new();
    write_node(&mut out, node, depth);
    out
}

fn write_element(
    out: &mut String,
    element: &ScriptElement,
    depth: usize,
) {
    match element {
        ScriptElement::Node(node) => write_node(out, node, depth),
        ScriptElement::Value(value) => write_value(out, value, depth),
    }
}

fn write_indent(
    out: &mut String,
    depth: usize,
) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn write_node(
    out: &mut String,
    node: &ScriptNode,
    depth: usize,
) {
    write_indent(out, depth);
    if !node.key.is_empty() {
        out.push_str(&node.key);
        out.push(' ');
    }
    out.push_str(&node.separator());
    for child in &node.children {
        out.push('\n');
        write_element(out, child, depth + 1);
    }
    out.push('\n');
    write_indent(out, depth);
    out.push('}');
}

fn write_value(
    out: &mut String,
    value: &ScriptValue,
    depth: usize,
) {
    write_indent(out, depth);
    if let Some(key) = &value.key {
        out.push_str(key);
        out.push(' ');
        out.push_str(value.operator.as_deref().unwrap_or("="));
        out.push(' ');
    }
    out.push_str(&normalize_number(&value.value));
}

/// Trims insignificant trailing zeros from a plain decimal literal:
/// `0.20` -> `0.2`, `10.0` -> `10`. Anything else is returned untouched,
/// including dates such as `2200.01.01` and quoted strings.
pub fn normalize_number(token: &str) -> Cow<'_, str> {
    let Some(captures) = DECIMAL_LITERAL.captures(token) else {
        return Cow::Borrowed(token);
    };
    let whole = &captures[1];
    let fraction = captures[2].trim_end_matches('0');
    if fraction.is_empty() {
        return Cow::Owned(whole.to_string());
    }
    if fraction.len() == captures[2].len() {
        return Cow::Borrowed(token);
    }
    Cow::Owned(format!("{whole}.{fraction}"))
}

/// Line-level normalization for content that is not structurally
/// parseable (shaders, free text): LF endings, tabs expanded to the
/// canonical indent, trailing whitespace and blank edges removed.
pub fn normalize_text<S: AsRef<str>>(lines: &[S]) -> String {
    let normalized: Vec<String> = lines
        .iter()
        .flat_map(|line| line.as_ref().split('\n').map(str::to_string).collect::<Vec<_>>())
        .map(|line| line.trim_end_matches('\r').replace('\t', INDENT).trim_end().to_string())
        .collect();
    let start = normalized.iter().position(|line| !line.is_empty()).unwrap_or(normalized.len());
    let end = normalized.iter().rposition(|line| !line.is_empty()).map_or(start, |idx| idx + 1);
    normalized[start..end].join("\n")
}

#[cfg(test)]
#[path = "../../tests/src/syntax/format_tests.rs"]
mod tests;
