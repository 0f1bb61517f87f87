use tracing::debug;

use super::{
    CanParseArgs, ExtractionStrategy, ParserArgs,
    split::variable_definition,
};
use crate::{
    definition::{Definition, ValueType, file_name},
    syntax::{ParseError, ScriptElement, format::format_node, is_empty_script, parse_lines},
};

/// Fallback for script files no rule claims: one definition per top-level
/// statement.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStrategy;

impl ExtractionStrategy for DefaultStrategy {
    fn name(&self) -> &'static str {
        "default"
    }

    fn can_parse(
        &self,
        args: &CanParseArgs<'_>,
    ) -> bool {
        args.rule.is_none() && args.ruleset.is_script_file(args.file)
    }

    fn parse(
        &self,
        args: &ParserArgs<'_>,
    ) -> Result<Vec<Definition>, ParseError> {
        let type_key = args.type_key();
        if is_empty_script(args.lines) {
            let id = file_name(args.file).to_string();
            return Ok(vec![args.definition(id, type_key, String::new(), ValueType::EmptyFile)]);
        }

        let document = parse_lines(args.lines)?;
        let mut out = Vec::with_capacity(document.elements.len());
        for element in &document.elements {
            match element {
                ScriptElement::Node(node) if node.key.is_empty() => {
                    debug!("[dispatch] skipping anonymous block at {}:{}", args.file, node.line);
                },
                ScriptElement::Node(node) => {
                    let mut definition =
                        args.definition(node.key.clone(), type_key.as_str(), format_node(node, 0), ValueType::Object);
                    definition.tags.push(node.key.clone());
                    out.push(definition);
                },
                ScriptElement::Value(value) if value.key.is_some() => {
                    out.push(variable_definition(args, &type_key, value, None));
                },
                ScriptElement::Value(value) => {
                    debug!("[dispatch] skipping bare value `{}` in {}", value.value, args.file);
                },
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/src/dispatch/default_tests.rs"]
mod tests;
