//! Recognized structure of a script fragment.
//!
//! The tree is deliberately shallow: objects, keyed scalars and bare
//! values. Comments and whitespace are dropped during recognition.

use crate::syntax::queries::unquote;

/// A parsed script: the ordered top-level statements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptDocument {
    pub elements: Vec<ScriptElement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptElement {
    Node(ScriptNode),
    Value(ScriptValue),
}

/// A brace-delimited object, e.g. `key = { ... }`, `key { ... }`,
/// `color = hsv { ... }` or an anonymous `{ ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptNode {
    /// Empty for anonymous blocks.
    pub key: String,
    pub operator: Option<String>,
    /// Word between the operator and the opening brace (`hsv`, `rgb`).
    pub prefix: Option<String>,
    pub children: Vec<ScriptElement>,
    /// 1-based line of the key (or of the brace for anonymous blocks).
    pub line: usize,
    /// 1-based line of the closing brace.
    pub end_line: usize,
}

/// A scalar statement: `key = value`, `key >= value` or a bare `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptValue {
    pub key: Option<String>,
    pub operator: Option<String>,
    /// Raw token text; quoted strings keep their quotes.
    pub value: String,
    pub line: usize,
}

impl ScriptDocument {
    pub fn new(elements: Vec<ScriptElement>) -> Self {
        Self {
            elements,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ScriptNode> {
        self.elements.iter().filter_map(ScriptElement::as_node)
    }

    pub fn find_node(
        &self,
        key: &str,
    ) -> Option<&ScriptNode> {
        self.nodes().find(|node| node.key.eq_ignore_ascii_case(key))
    }
}

impl ScriptElement {
    pub fn key(&self) -> Option<&str> {
        match self {
            ScriptElement::Node(node) if !node.key.is_empty() => Some(&node.key),
            ScriptElement::Node(_) => None,
            ScriptElement::Value(value) => value.key.as_deref(),
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ScriptElement::Node(node) => node.line,
            ScriptElement::Value(value) => value.line,
        }
    }

    pub fn end_line(&self) -> usize {
        match self {
            ScriptElement::Node(node) => node.end_line,
            ScriptElement::Value(value) => value.line,
        }
    }

    pub fn as_node(&self) -> Option<&ScriptNode> {
        match self {
            ScriptElement::Node(node) => Some(node),
            ScriptElement::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&ScriptValue> {
        match self {
            ScriptElement::Value(value) => Some(value),
            ScriptElement::Node(_) => None,
        }
    }

    pub fn has_key(
        &self,
        key: &str,
    ) -> bool {
        self.key().is_some_and(|k| k.eq_ignore_ascii_case(key))
    }

    /// `@name = value` at any nesting level.
    pub fn is_variable(&self) -> bool {
        matches!(self, ScriptElement::Value(value) if value.is_variable())
    }
}

impl ScriptNode {
    pub fn new(
        key: impl Into<String>,
        children: Vec<ScriptElement>,
    ) -> Self {
        Self {
            key: key.into(),
            operator: Some("=".to_string()),
            prefix: None,
            children,
            line: 0,
            end_line: 0,
        }
    }

    /// The opening-brace token as written after the key: `= {`, `{`,
    /// `= hsv {`.
    pub fn separator(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if let Some(op) = &self.operator {
            parts.push(op);
        }
        if let Some(prefix) = &self.prefix {
            parts.push(prefix);
        }
        parts.push("{");
        parts.join(" ")
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = &ScriptNode> {
        self.children.iter().filter_map(ScriptElement::as_node)
    }

    pub fn child_values(&self) -> impl Iterator<Item = &ScriptValue> {
        self.children.iter().filter_map(ScriptElement::as_value)
    }

    /// Unquoted value of the first direct child `key = value`.
    pub fn value_of(
        &self,
        key: &str,
    ) -> Option<String> {
        self.child_values()
            .find(|value| value.key.as_deref().is_some_and(|k| k.eq_ignore_ascii_case(key)))
            .map(|value| unquote(&value.value).to_string())
    }

    /// First of `keys` (in order of preference) present as a direct child
    /// scalar.
    pub fn first_value_of(
        &self,
        keys: &[String],
    ) -> Option<String> {
        keys.iter().find_map(|key| self.value_of(key))
    }

    pub fn child_node(
        &self,
        key: &str,
    ) -> Option<&ScriptNode> {
        self.child_nodes().find(|node| node.key.eq_ignore_ascii_case(key))
    }

    /// Bare (keyless) values directly inside this object, unquoted.
    pub fn bare_values(&self) -> Vec<String> {
        self.child_values().filter(|value| value.key.is_none()).map(|value| unquote(&value.value).to_string()).collect()
    }

    /// True when every child is a bare value (including the empty case).
    pub fn is_leaf_list(&self) -> bool {
        self.children.iter().all(|child| matches!(child, ScriptElement::Value(value) if value.key.is_none()))
    }
}

impl ScriptValue {
    pub fn keyed(
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: Some(key.into()),
            operator: Some("=".to_string()),
            value: value.into(),
            line: 0,
        }
    }

    pub fn is_variable(&self) -> bool {
        self.key.as_deref().is_some_and(|key| key.starts_with('@'))
    }
}
