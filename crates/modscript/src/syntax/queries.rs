use std::borrow::Cow;

use crate::syntax::{
    kind::SyntaxKind,
    lexer::Lexer,
    parser::{join_lines, parse_lines, parse_text},
    tree::{ScriptDocument, ScriptElement},
};

/// Strips one pair of surrounding double quotes and unescapes `\"`.
pub fn unquote(value: &str) -> Cow<'_, str> {
    let trimmed = value.trim();
    match trimmed.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) if inner.contains("\\\"") => Cow::Owned(inner.replace("\\\"", "\"")),
        Some(inner) => Cow::Borrowed(inner),
        None => Cow::Borrowed(trimmed),
    }
}

/// Removes a trailing `#` comment that is not inside a quoted string.
pub fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '\\' if in_quotes => {
                escaped = !escaped;
                continue;
            },
            '"' if !escaped => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..idx],
            _ => {},
        }
        escaped = false;
    }
    line
}

/// Trimmed, comment-free, non-empty lines.
pub fn clean_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .flat_map(|line| line.as_ref().split('\n').map(str::to_string).collect::<Vec<_>>())
        .map(|line| strip_comment(&line).trim().trim_start_matches('\u{feff}').trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// True when the lines hold nothing but whitespace and comments.
pub fn is_empty_script<S: AsRef<str>>(lines: &[S]) -> bool {
    clean_lines(lines).is_empty()
}

/// First scalar value assigned to `key` anywhere in the tree (pre-order),
/// unquoted.
pub fn find_value(
    document: &ScriptDocument,
    key: &str,
) -> Option<String> {
    find_in_elements(&document.elements, key)
}

fn find_in_elements(
    elements: &[ScriptElement],
    key: &str,
) -> Option<String> {
    for element in elements {
        match element {
            ScriptElement::Value(value) => {
                if value.key.as_deref().is_some_and(|k| k.eq_ignore_ascii_case(key)) {
                    return Some(unquote(&value.value).to_string());
                }
            },
            ScriptElement::Node(node) => {
                if let Some(found) = find_in_elements(&node.children, key) {
                    return Some(found);
                }
            },
        }
    }
    None
}

/// [`find_value`] over raw text; `None` when the text is not parseable.
pub fn find_value_in_text(
    text: &str,
    key: &str,
) -> Option<String> {
    let document = parse_text(text).ok()?;
    find_value(&document, key)
}

/// [`find_value`] over raw lines; `None` when the lines are not parseable.
pub fn find_value_in_lines<S: AsRef<str>>(
    lines: &[S],
    key: &str,
) -> Option<String> {
    let document = parse_lines(lines).ok()?;
    find_value(&document, key)
}

/// Whether `lines` hold exactly one statement written inline.
///
/// One meaningful line qualifies. Two lines qualify only when the first is
/// nothing but an opener (`key = {`) and the second completes the
/// statement. Three or more meaningful lines never qualify, even when the
/// statement itself is trivial.
pub fn is_inline_statement<S: AsRef<str>>(lines: &[S]) -> bool {
    let cleaned = clean_lines(lines);
    match cleaned.len() {
        1 => is_single_statement(&cleaned),
        2 => is_opener_only(&cleaned[0]) && is_single_statement(&cleaned),
        _ => false,
    }
}

fn is_single_statement(lines: &[String]) -> bool {
    parse_text(&join_lines(lines)).is_ok_and(|document| document.elements.len() == 1)
}

fn is_opener_only(line: &str) -> bool {
    let kinds: Vec<SyntaxKind> = Lexer::new(line).significant().map(|lexeme| lexeme.kind).collect();
    match kinds.as_slice() {
        [key, op, SyntaxKind::LBrace] => key.is_atom() && op.is_operator(),
        [key, SyntaxKind::LBrace] => key.is_atom(),
        _ => false,
    }
}

#[cfg(test)]
#[path = "../../tests/src/syntax/queries_tests.rs"]
mod tests;
