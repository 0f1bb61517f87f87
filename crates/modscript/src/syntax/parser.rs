use thiserror::Error;

use crate::syntax::{
    kind::SyntaxKind,
    lexer::{Lexeme, Lexer},
    tree::{ScriptDocument, ScriptElement, ScriptNode, ScriptValue},
};

/// Structural recognition failure. Positions are 1-based; `0` when the
/// failure has no source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected character `{text}` at {line}:{column}")]
    UnexpectedCharacter {
        line: usize,
        column: usize,
        text: String,
    },
    #[error("unexpected `}}` at {line}:{column}")]
    UnexpectedClosingBrace {
        line: usize,
        column: usize,
    },
    #[error("`{{` opened at {line}:{column} is never closed")]
    UnclosedBrace {
        line: usize,
        column: usize,
    },
    #[error("operator without a key at {line}:{column}")]
    MissingKey {
        line: usize,
        column: usize,
    },
    #[error("`{key}` at {line}:{column} has an operator but no value")]
    MissingValue {
        line: usize,
        column: usize,
        key: String,
    },
    #[error("`{parser}` transforms text and cannot extract definitions from {file}")]
    NotExtractable {
        parser: &'static str,
        file: String,
    },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedCharacter {
                line,
                ..
            }
            | Self::UnexpectedClosingBrace {
                line,
                ..
            }
            | Self::UnclosedBrace {
                line,
                ..
            }
            | Self::MissingKey {
                line,
                ..
            }
            | Self::MissingValue {
                line,
                ..
            } => *line,
            Self::NotExtractable {
                ..
            } => 0,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            Self::UnexpectedCharacter {
                column,
                ..
            }
            | Self::UnexpectedClosingBrace {
                column,
                ..
            }
            | Self::UnclosedBrace {
                column,
                ..
            }
            | Self::MissingKey {
                column,
                ..
            }
            | Self::MissingValue {
                column,
                ..
            } => *column,
            Self::NotExtractable {
                ..
            } => 0,
        }
    }
}

type Token<'a> = Lexeme<'a>;

/// Recursive-descent recognizer over the significant tokens of a script.
///
/// Nesting is recovered purely from brace counting, so inline objects
/// (`a = { b = { c = 1 } }`) and stacked closings (`} }`) parse the same
/// as their multi-line forms.
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            tokens: Lexer::new(input).significant().collect(),
            pos: 0,
        }
    }

    pub fn parse(mut self) -> Result<ScriptDocument, ParseError> {
        let elements = self.parse_elements(None)?;
        Ok(ScriptDocument::new(elements))
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// Parses statements until EOF (top level) or the `}` matching `opener`.
    fn parse_elements(
        &mut self,
        opener: Option<Token<'a>>,
    ) -> Result<Vec<ScriptElement>, ParseError> {
        let mut elements = Vec::new();

        loop {
            let Some(token) = self.peek() else {
                return match opener {
                    Some(open) => Err(ParseError::UnclosedBrace {
                        line: open.line,
                        column: open.column,
                    }),
                    None => Ok(elements),
                };
            };

            match token.kind {
                SyntaxKind::RBrace => {
                    if opener.is_none() {
                        return Err(ParseError::UnexpectedClosingBrace {
                            line: token.line,
                            column: token.column,
                        });
                    }
                    return Ok(elements);
                },
                SyntaxKind::LBrace => {
                    self.bump();
                    let (children, end_line) = self.parse_block(token)?;
                    elements.push(ScriptElement::Node(ScriptNode {
                        key: String::new(),
                        operator: None,
                        prefix: None,
                        children,
                        line: token.line,
                        end_line,
                    }));
                },
                kind if kind.is_operator() => {
                    return Err(ParseError::MissingKey {
                        line: token.line,
                        column: token.column,
                    });
                },
                kind if kind.is_atom() => {
                    self.bump();
                    elements.push(self.parse_statement(token)?);
                },
                _ => {
                    return Err(ParseError::UnexpectedCharacter {
                        line: token.line,
                        column: token.column,
                        text: token.text.to_string(),
                    });
                },
            }
        }
    }

    /// Parses the body after an already-consumed `{` and consumes its `}`.
    fn parse_block(
        &mut self,
        opener: Token<'a>,
    ) -> Result<(Vec<ScriptElement>, usize), ParseError> {
        let children = self.parse_elements(Some(opener))?;
        let close = self.bump().ok_or(ParseError::UnclosedBrace {
            line: opener.line,
            column: opener.column,
        })?;
        Ok((children, close.line))
    }

    fn parse_statement(
        &mut self,
        key: Token<'a>,
    ) -> Result<ScriptElement, ParseError> {
        let Some(next) = self.peek() else {
            return Ok(bare_value(key));
        };

        if key.kind == SyntaxKind::Word && next.kind == SyntaxKind::LBrace {
            self.bump();
            let (children, end_line) = self.parse_block(next)?;
            return Ok(ScriptElement::Node(ScriptNode {
                key: key.text.to_string(),
                operator: None,
                prefix: None,
                children,
                line: key.line,
                end_line,
            }));
        }

        if !next.kind.is_operator() {
            return Ok(bare_value(key));
        }
        self.bump();
        let operator = next.text.to_string();

        let missing_value = || ParseError::MissingValue {
            line: key.line,
            column: key.column,
            key: key.text.to_string(),
        };
        let value = self.bump().ok_or_else(missing_value)?;

        match value.kind {
            SyntaxKind::LBrace => {
                let (children, end_line) = self.parse_block(value)?;
                Ok(ScriptElement::Node(ScriptNode {
                    key: key.text.to_string(),
                    operator: Some(operator),
                    prefix: None,
                    children,
                    line: key.line,
                    end_line,
                }))
            },
            kind if kind.is_atom() => {
                if kind == SyntaxKind::Word
                    && let Some(brace) = self.peek()
                    && brace.kind == SyntaxKind::LBrace
                    && brace.line == value.line
                {
                    self.bump();
                    let (children, end_line) = self.parse_block(brace)?;
                    return Ok(ScriptElement::Node(ScriptNode {
                        key: key.text.to_string(),
                        operator: Some(operator),
                        prefix: Some(value.text.to_string()),
                        children,
                        line: key.line,
                        end_line,
                    }));
                }
                Ok(ScriptElement::Value(ScriptValue {
                    key: Some(key.text.to_string()),
                    operator: Some(operator),
                    value: value.text.to_string(),
                    line: key.line,
                }))
            },
            SyntaxKind::Error => Err(ParseError::UnexpectedCharacter {
                line: value.line,
                column: value.column,
                text: value.text.to_string(),
            }),
            _ => Err(missing_value()),
        }
    }
}

fn bare_value(token: Token<'_>) -> ScriptElement {
    ScriptElement::Value(ScriptValue {
        key: None,
        operator: None,
        value: token.text.to_string(),
        line: token.line,
    })
}

/// Parses a complete script text.
pub fn parse_text(text: &str) -> Result<ScriptDocument, ParseError> {
    Parser::new(text).parse()
}

/// Parses an ordered sequence of physical lines.
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<ScriptDocument, ParseError> {
    let text = join_lines(lines);
    parse_text(&text)
}

pub(crate) fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().map(AsRef::as_ref).collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
#[path = "../../tests/src/syntax/parser_tests.rs"]
mod tests;
