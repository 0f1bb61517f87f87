//! Object splitting shared by the object, child-object and overwritten
//! strategies.

use super::ParserArgs;
use crate::{
    definition::{Definition, ValueType},
    rules::StrategyOptions,
    syntax::{
        ParseError, ScriptElement, ScriptNode, ScriptValue, format::format_node, format_element, parse_lines,
    },
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct SplitMode {
    pub value_type: ValueType,
    /// Treat every top-level block as a wrapper, regardless of child keys.
    pub descend: bool,
    /// Emit `@name` assignments found below the top level.
    pub nested_variables: bool,
}

pub(crate) fn split_objects(
    args: &ParserArgs<'_>,
    mode: SplitMode,
) -> Result<Vec<Definition>, ParseError> {
    let document = parse_lines(args.lines)?;
    let options = args.rule.map(|rule| rule.options.clone()).unwrap_or_default();
    let descend = mode.descend || options.descend;
    let type_key = args.type_key();
    let mut out = Vec::new();

    for element in &document.elements {
        match element {
            ScriptElement::Value(value) if value.is_variable() => {
                out.push(variable_definition(args, &type_key, value, None));
            },
            ScriptElement::Value(_) => {},
            ScriptElement::Node(node) => {
                let is_wrapper = descend || (!options.child_keys.is_empty() && !matches_key(&options, &node.key));
                if !is_wrapper {
                    out.push(object_definition(args, &type_key, node, None, &options, mode.value_type));
                    if mode.nested_variables {
                        collect_variables(args, &type_key, node, &mut out);
                    }
                    continue;
                }
                split_wrapper(args, &type_key, node, &options, mode, &mut out);
            },
        }
    }

    Ok(out)
}

fn split_wrapper(
    args: &ParserArgs<'_>,
    type_key: &str,
    wrapper: &ScriptNode,
    options: &StrategyOptions,
    mode: SplitMode,
    out: &mut Vec<Definition>,
) {
    let is_split_child = |child: &ScriptNode| !child.key.is_empty() && matches_key(options, &child.key);

    if !wrapper.child_nodes().any(is_split_child) {
        out.push(object_definition(args, type_key, wrapper, None, options, mode.value_type));
        if mode.nested_variables {
            collect_variables(args, type_key, wrapper, out);
        }
        return;
    }

    for element in &wrapper.children {
        match element {
            ScriptElement::Value(value) if value.is_variable() => {
                out.push(variable_definition(args, type_key, value, Some(wrapper)));
            },
            ScriptElement::Value(_) => {},
            ScriptElement::Node(child) if is_split_child(child) => {
                out.push(object_definition(args, type_key, child, Some(wrapper), options, mode.value_type));
                if mode.nested_variables {
                    collect_variables(args, type_key, child, out);
                }
            },
            ScriptElement::Node(other) if mode.nested_variables => collect_variables(args, type_key, other, out),
            ScriptElement::Node(_) => {},
        }
    }
}

fn matches_key(
    options: &StrategyOptions,
    key: &str,
) -> bool {
    options.child_keys.is_empty() || options.child_keys.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Id of an object block: composite fields, then the first id field, then
/// the block key; a locale list is appended as sorted, `-`-joined tokens.
pub(crate) fn object_id(
    node: &ScriptNode,
    options: &StrategyOptions,
) -> String {
    let composite: Option<Vec<String>> = if options.composite_id_fields.is_empty() {
        None
    } else {
        options.composite_id_fields.iter().map(|field| node.value_of(field)).collect()
    };

    let mut id = composite
        .map(|parts| parts.join("-"))
        .or_else(|| node.first_value_of(&options.id_fields))
        .unwrap_or_else(|| node.key.clone());

    let locales = options.locale_fields.iter().find_map(|field| node.child_node(field).map(ScriptNode::bare_values));
    if let Some(mut locales) = locales.filter(|l| !l.is_empty()) {
        locales.sort();
        locales.dedup();
        id.push('-');
        id.push_str(&locales.join("-"));
    }
    id
}

fn object_definition(
    args: &ParserArgs<'_>,
    type_key: &str,
    node: &ScriptNode,
    parent: Option<&ScriptNode>,
    options: &StrategyOptions,
    value_type: ValueType,
) -> Definition {
    let id = object_id(node, options);
    let mut definition = args.definition(id.clone(), type_key, format_node(node, 0), value_type);
    definition.tags.push(id);
    if let Some(parent) = parent {
        definition = definition.with_context(parent.key.clone(), parent.separator());
    }
    definition
}

pub(crate) fn variable_definition(
    args: &ParserArgs<'_>,
    type_key: &str,
    value: &ScriptValue,
    parent: Option<&ScriptNode>,
) -> Definition {
    let id = value.key.clone().unwrap_or_default();
    let code = format_element(&ScriptElement::Value(value.clone()), 0);
    let mut definition = args.definition(id.clone(), type_key, code, ValueType::Variable);
    definition.tags.push(id);
    if let Some(parent) = parent {
        definition = definition.with_context(parent.key.clone(), parent.separator());
    }
    definition
}

/// Every `@name` assignment below `node`, tagged with its immediately
/// enclosing block.
fn collect_variables(
    args: &ParserArgs<'_>,
    type_key: &str,
    node: &ScriptNode,
    out: &mut Vec<Definition>,
) {
    for child in &node.children {
        match child {
            ScriptElement::Value(value) if value.is_variable() => {
                out.push(variable_definition(args, type_key, value, Some(node)));
            },
            ScriptElement::Value(_) => {},
            ScriptElement::Node(inner) => collect_variables(args, type_key, inner, out),
        }
    }
}
