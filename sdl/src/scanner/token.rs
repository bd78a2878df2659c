use std::fmt;

use crate::position::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Words and literals
    Identifier(String),
    /// Unescaped string contents.
    String(String),
    /// Number lexeme, kept verbatim.
    Number(String),
    Boolean(bool),
    /// `/` followed by a run of non-whitespace, e.g. `/users/{id}`.
    Path(String),

    // Punctuation
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Arrow,
    Equals,

    Newline,
    /// Unrecognized input. The scanner has already queued a diagnostic for it.
    Invalid(String),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier `{}`", name),
            TokenKind::String(_) => write!(f, "string"),
            TokenKind::Number(n) => write!(f, "number `{}`", n),
            TokenKind::Boolean(b) => write!(f, "`{}`", b),
            TokenKind::Path(p) => write!(f, "path `{}`", p),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Arrow => write!(f, "'->'"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::Newline => write!(f, "end of line"),
            TokenKind::Invalid(text) => write!(f, "`{}`", text),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
    /// Comments seen since the previous token, in source order, each starting with `#`.
    /// A comment sharing a line with code ends up on that line's `Newline` token.
    pub comments: Vec<String>,
}

impl Token {
    pub fn is(&self, kind: &TokenKind) -> bool {
        &self.kind == kind
    }
}
