use logos::Logos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    Error = 0,
    Whitespace,
    Newline,
    Comment,

    // Atoms
    Word,
    String,
    Variable,
    InlineMath,

    // Punctuation
    LBrace,
    RBrace,

    // Operators
    Equal,
    EqualEqual,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    QuestionEqual,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Newline | SyntaxKind::Comment)
    }

    /// Tokens that can stand as a key or a value.
    pub fn is_atom(self) -> bool {
        matches!(self, SyntaxKind::Word | SyntaxKind::String | SyntaxKind::Variable | SyntaxKind::InlineMath)
    }

    pub fn is_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::Equal
                | SyntaxKind::EqualEqual
                | SyntaxKind::NotEqual
                | SyntaxKind::Less
                | SyntaxKind::Greater
                | SyntaxKind::LessEqual
                | SyntaxKind::GreaterEqual
                | SyntaxKind::QuestionEqual
        )
    }
}

/// Logos-derived token definitions.
///
/// Bare words exclude the characters that start any other token so that
/// every input byte has exactly one candidate rule.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[regex(r"[ \t\r\f\u{feff}]+")]
    Whitespace,
    #[token("\n")]
    Newline,
    #[regex(r"#[^\n]*", allow_greedy = true)]
    Comment,

    #[regex(r##"[^\s{}="#<>@!?\u{feff}][^\s{}="#<>]*"##)]
    Word,
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    #[regex(r##"@[^\s{}="#<>\[][^\s{}="#<>]*"##)]
    Variable,
    #[regex(r"@\[[^\]]*\]")]
    InlineMath,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[token("=")]
    Equal,
    #[token("==")]
    EqualEqual,
    #[token("!=")]
    NotEqual,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("<=")]
    LessEqual,
    #[token(">=")]
    GreaterEqual,
    #[token("?=")]
    QuestionEqual,
}

impl From<TokenKind> for SyntaxKind {
    fn from(token: TokenKind) -> Self {
        match token {
            TokenKind::Whitespace => SyntaxKind::Whitespace,
            TokenKind::Newline => SyntaxKind::Newline,
            TokenKind::Comment => SyntaxKind::Comment,
            TokenKind::Word => SyntaxKind::Word,
            TokenKind::String => SyntaxKind::String,
            TokenKind::Variable => SyntaxKind::Variable,
            TokenKind::InlineMath => SyntaxKind::InlineMath,
            TokenKind::LBrace => SyntaxKind::LBrace,
            TokenKind::RBrace => SyntaxKind::RBrace,
            TokenKind::Equal => SyntaxKind::Equal,
            TokenKind::EqualEqual => SyntaxKind::EqualEqual,
            TokenKind::NotEqual => SyntaxKind::NotEqual,
            TokenKind::Less => SyntaxKind::Less,
            TokenKind::Greater => SyntaxKind::Greater,
            TokenKind::LessEqual => SyntaxKind::LessEqual,
            TokenKind::GreaterEqual => SyntaxKind::GreaterEqual,
            TokenKind::QuestionEqual => SyntaxKind::QuestionEqual,
        }
    }
}
