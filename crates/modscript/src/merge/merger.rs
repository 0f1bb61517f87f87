use tracing::{debug, warn};

use crate::{
    definition::Definition,
    dispatch::{CanParseArgs, ExtractionStrategy, ParserArgs},
    syntax::{ParseError, ScriptDocument, ScriptElement, format_document, parse_text},
};

/// Inserts keyed blocks into a top-level object.
///
/// Shares the strategies' calling conventions but never claims a file;
/// extracting through it is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeMerger;

impl CodeMerger {
    /// Merges every `merge_key` block of `new_text` into the first
    /// top-level `top_level_key` object of `base`.
    ///
    /// Prepend mode inserts before the first existing `merge_key` sibling
    /// (or at the end when there is none); append mode inserts after the
    /// object's last statement. `new_text` may hold the blocks directly or
    /// wrapped in its own `top_level_key` object.
    ///
    /// The result is canonical text. When either side fails to parse, or a
    /// key is missing, `base` is returned unchanged.
    pub fn merge_top_level(
        base: &str,
        top_level_key: &str,
        merge_key: &str,
        new_text: &str,
        append: bool,
    ) -> String {
        let mut document = match parse_text(base) {
            Ok(document) => document,
            Err(error) => {
                warn!("[merge] base text for {top_level_key} does not parse: {error}");
                return base.to_string();
            },
        };
        let incoming = match parse_text(new_text) {
            Ok(document) => document,
            Err(error) => {
                warn!("[merge] merge text for {merge_key} does not parse: {error}");
                return base.to_string();
            },
        };

        let blocks = incoming_blocks(&incoming, top_level_key, merge_key);
        if blocks.is_empty() {
            debug!("[merge] no {merge_key} blocks to merge into {top_level_key}");
            return base.to_string();
        }

        let Some(target) = document.elements.iter_mut().find_map(|element| match element {
            ScriptElement::Node(node) if node.key.eq_ignore_ascii_case(top_level_key) => Some(node),
            _ => None,
        }) else {
            debug!("[merge] {top_level_key} not found in base text");
            return base.to_string();
        };

        let position = if append {
            target.children.len()
        } else {
            target.children.iter().position(|child| child.has_key(merge_key)).unwrap_or(target.children.len())
        };
        let count = blocks.len();
        target.children.splice(position..position, blocks);
        debug!(
            "[merge] {} {count} {merge_key} block(s) into {top_level_key} at {position}",
            if append { "appended" } else { "prepended" }
        );

        format_document(&document)
    }
}

fn incoming_blocks(
    incoming: &ScriptDocument,
    top_level_key: &str,
    merge_key: &str,
) -> Vec<ScriptElement> {
    let direct: Vec<ScriptElement> =
        incoming.elements.iter().filter(|element| element.has_key(merge_key)).cloned().collect();
    if !direct.is_empty() {
        return direct;
    }
    incoming
        .find_node(top_level_key)
        .map(|wrapper| wrapper.children.iter().filter(|child| child.has_key(merge_key)).cloned().collect())
        .unwrap_or_default()
}

impl ExtractionStrategy for CodeMerger {
    fn name(&self) -> &'static str {
        "code_merger"
    }

    fn can_parse(
        &self,
        _args: &CanParseArgs<'_>,
    ) -> bool {
        false
    }

    fn parse(
        &self,
        args: &ParserArgs<'_>,
    ) -> Result<Vec<Definition>, ParseError> {
        Err(ParseError::NotExtractable {
            parser: self.name(),
            file: args.file.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src/merge/merger_tests.rs"]
mod tests;
