use super::{
    CanParseArgs, ExtractionStrategy, ParserArgs,
    split::variable_definition,
};
use crate::{
    definition::{Definition, TYPE_ID_SEPARATOR, ValueType},
    rules::StrategyKind,
    syntax::{ParseError, ScriptElement, ScriptNode, format_element, parse_lines},
};

const PATH_DELIMITER: &str = ".";

/// Constants files: every leaf scalar or leaf list becomes one
/// `SpecialVariable`, addressed by its dotted path below the top-level
/// block and typed by that block's name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefinesStrategy;

impl ExtractionStrategy for DefinesStrategy {
    fn name(&self) -> &'static str {
        "defines"
    }

    fn can_parse(
        &self,
        args: &CanParseArgs<'_>,
    ) -> bool {
        args.rule.is_some_and(|rule| rule.strategy == StrategyKind::Defines)
    }

    fn parse(
        &self,
        args: &ParserArgs<'_>,
    ) -> Result<Vec<Definition>, ParseError> {
        let document = parse_lines(args.lines)?;
        let base_type = args.type_key();
        let mut out = Vec::new();

        for element in &document.elements {
            match element {
                ScriptElement::Value(value) if value.is_variable() => {
                    out.push(variable_definition(args, &base_type, value, None));
                },
                ScriptElement::Value(value) => {
                    let Some(key) = value.key.clone() else {
                        continue;
                    };
                    let code = format_element(element, 0);
                    let mut definition =
                        args.definition(key.clone(), base_type.as_str(), code, ValueType::SpecialVariable);
                    definition.tags.push(key);
                    out.push(definition);
                },
                ScriptElement::Node(block) if block.key.is_empty() => {},
                ScriptElement::Node(block) => {
                    let type_key = format!("{base_type}{TYPE_ID_SEPARATOR}{}", block.key);
                    let mut flattener = Flattener {
                        args,
                        block,
                        type_key,
                        out: &mut out,
                    };
                    flattener.walk(block, &mut Vec::new(), &mut Vec::new());
                },
            }
        }

        Ok(out)
    }
}

struct Flattener<'a, 'b> {
    args: &'a ParserArgs<'b>,
    block: &'a ScriptNode,
    type_key: String,
    out: &'a mut Vec<Definition>,
}

impl<'a, 'b> Flattener<'a, 'b> {
    /// `path` holds the keys below the top-level block; `ancestors` the
    /// matching nodes, used to rebuild the enclosing structure.
    fn walk(
        &mut self,
        node: &'a ScriptNode,
        path: &mut Vec<&'a str>,
        ancestors: &mut Vec<&'a ScriptNode>,
    ) {
        for child in &node.children {
            match child {
                ScriptElement::Value(value) => {
                    let Some(key) = value.key.as_deref() else {
                        continue;
                    };
                    path.push(key);
                    self.emit(path, ancestors, child);
                    path.pop();
                },
                ScriptElement::Node(inner) if inner.key.is_empty() => {},
                ScriptElement::Node(inner) if inner.is_leaf_list() => {
                    path.push(&inner.key);
                    self.emit(path, ancestors, child);
                    path.pop();
                },
                ScriptElement::Node(inner) => {
                    path.push(&inner.key);
                    ancestors.push(inner);
                    self.walk(inner, path, ancestors);
                    ancestors.pop();
                    path.pop();
                },
            }
        }
    }

    fn emit(
        &mut self,
        path: &[&str],
        ancestors: &[&ScriptNode],
        leaf: &ScriptElement,
    ) {
        let mut wrapped = leaf.clone();
        for ancestor in ancestors.iter().rev().chain(std::iter::once(&self.block)) {
            wrapped = ScriptElement::Node(ScriptNode {
                key: ancestor.key.clone(),
                operator: ancestor.operator.clone(),
                prefix: ancestor.prefix.clone(),
                children: vec![wrapped],
                line: ancestor.line,
                end_line: ancestor.end_line,
            });
        }
        let code = format_element(&wrapped, 0);

        let id = path.join(PATH_DELIMITER);
        let mut definition = self
            .args
            .definition(id.clone(), self.type_key.as_str(), code, ValueType::SpecialVariable)
            .with_context(self.block.key.clone(), self.block.separator());
        definition.tags.push(id);
        self.out.push(definition);
    }
}

#[cfg(test)]
#[path = "../../tests/src/dispatch/defines_tests.rs"]
mod tests;
