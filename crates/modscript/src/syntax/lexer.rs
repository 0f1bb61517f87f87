//! Positioned token stream over script text.

use logos::Logos;

use crate::syntax::kind::{SyntaxKind, TokenKind};

/// One token with the 1-based position of its first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub line: usize,
    pub column: usize,
}

impl<'a> Lexeme<'a> {
    pub fn pair(self) -> (SyntaxKind, &'a str) {
        (self.kind, self.text)
    }
}

/// Yields every token, trivia included. Bytes no rule accepts come out as
/// [`SyntaxKind::Error`].
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
            line: 1,
            column: 1,
        }
    }

    /// Only the tokens the recognizer cares about.
    pub fn significant(self) -> impl Iterator<Item = Lexeme<'a>> {
        self.filter(|lexeme| !lexeme.kind.is_trivia())
    }

    fn advance(
        &mut self,
        text: &str,
    ) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Lexeme<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = match self.inner.next()? {
            Ok(token) => SyntaxKind::from(token),
            Err(()) => SyntaxKind::Error,
        };
        let text = self.inner.slice();
        let lexeme = Lexeme {
            kind,
            text,
            line: self.line,
            column: self.column,
        };
        self.advance(text);
        Some(lexeme)
    }
}

#[cfg(test)]
#[path = "../../tests/src/syntax/lexer_tests.rs"]
mod tests;
