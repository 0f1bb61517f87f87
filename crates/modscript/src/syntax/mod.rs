//! Structural tokenizer and canonicalizer for brace-delimited mod scripts.

pub mod format;
pub mod kind;
pub mod lexer;
pub mod parser;
pub mod queries;
pub mod tree;

pub use format::{format_code, format_document, format_element, format_lines, normalize_number, normalize_text};
pub use parser::{ParseError, Parser, parse_lines, parse_text};
pub use queries::{
    clean_lines, find_value, find_value_in_lines, find_value_in_text, is_empty_script, is_inline_statement, unquote,
};
pub use tree::{ScriptDocument, ScriptElement, ScriptNode, ScriptValue};
