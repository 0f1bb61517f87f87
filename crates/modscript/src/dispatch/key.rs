use tracing::debug;

use super::{
    CanParseArgs, ExtractionStrategy, ParserArgs,
    split::variable_definition,
};
use crate::{
    definition::{Definition, ValueType, file_stem},
    rules::StrategyKind,
    syntax::{ParseError, ScriptElement, ScriptNode, format::format_node, is_inline_statement, parse_lines},
};

const NAMESPACE_KEY: &str = "namespace";

/// Event and decision files: one object per top-level block, named by its
/// first id field, plus namespace and `@name` statements in source order.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyStrategy;

impl ExtractionStrategy for KeyStrategy {
    fn name(&self) -> &'static str {
        "key"
    }

    fn can_parse(
        &self,
        args: &CanParseArgs<'_>,
    ) -> bool {
        args.rule.is_some_and(|rule| rule.strategy == StrategyKind::Key)
    }

    fn parse(
        &self,
        args: &ParserArgs<'_>,
    ) -> Result<Vec<Definition>, ParseError> {
        let document = parse_lines(args.lines)?;
        let id_fields = args.rule.map(|rule| rule.options.id_fields.as_slice()).unwrap_or_default();
        let type_key = args.type_key();
        let mut out = Vec::new();

        for element in &document.elements {
            match element {
                ScriptElement::Value(value) if value.is_variable() => {
                    out.push(variable_definition(args, &type_key, value, None));
                },
                ScriptElement::Value(value) if element.has_key(NAMESPACE_KEY) => {
                    let id = format!("{}-{}", file_stem(args.file), NAMESPACE_KEY);
                    let code = format!("{} = {}", NAMESPACE_KEY, value.value);
                    let mut definition = args.definition(id, type_key.as_str(), code, ValueType::Namespace);
                    definition.tags.push(value.value.clone());
                    out.push(definition);
                },
                ScriptElement::Value(value) => {
                    let name = value.key.as_deref().unwrap_or(&value.value);
                    debug!("[dispatch] ignoring top-level `{}` in {}", name, args.file);
                },
                ScriptElement::Node(node) => {
                    if is_trivial(args, node) {
                        debug!("[dispatch] skipping empty `{}` in {}", node.key, args.file);
                        continue;
                    }
                    let id = node.first_value_of(id_fields).unwrap_or_else(|| node.key.clone());
                    let mut definition =
                        args.definition(id.clone(), type_key.as_str(), format_node(node, 0), ValueType::Object);
                    definition.tags.push(id);
                    out.push(definition);
                },
            }
        }

        Ok(out)
    }
}

/// An empty block written inline in the source, e.g. `a = { }` or a bare
/// opener followed by its closing brace.
fn is_trivial(
    args: &ParserArgs<'_>,
    node: &ScriptNode,
) -> bool {
    if !node.children.is_empty() || node.line == 0 {
        return false;
    }
    let start = node.line - 1;
    let end = node.end_line.min(args.lines.len());
    start < end && is_inline_statement(&args.lines[start..end])
}

#[cfg(test)]
#[path = "../../tests/src/dispatch/key_tests.rs"]
mod tests;
