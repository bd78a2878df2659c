pub mod token;

use std::sync::Arc;

use tracing::trace;

use crate::diagnostic::Diagnostic;
use crate::position::Position;

pub use token::{Token, TokenKind};

/// Lazy tokenizer over SDL source text.
///
/// The scanner never fails: unrecognized input becomes an [`TokenKind::Invalid`] token
/// and a queued diagnostic, and scanning resumes at the next character. It yields
/// exactly one [`TokenKind::Eof`] and then ends. Cloning a scanner snapshots its state,
/// so scanning can be restarted from any point.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    file: Arc<str>,
    offset: usize,
    line: usize,
    column: usize,
    comments: Vec<String>,
    diagnostics: Vec<Diagnostic>,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(file: Arc<str>, source: &'a str) -> Self {
        Scanner {
            source,
            file,
            offset: 0,
            line: 1,
            column: 1,
            comments: Vec::new(),
            diagnostics: Vec::new(),
            finished: false,
        }
    }

    /// Drain the diagnostics queued so far.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn here(&self) -> Position {
        Position::new(self.file.clone(), self.line, self.column, self.offset)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn bump_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let start = self.offset;
        while let Some(c) = self.peek() {
            if !keep(c) {
                break;
            }
            self.bump();
        }
        &self.source[start..self.offset]
    }

    fn token(&mut self, kind: TokenKind, position: Position) -> Token {
        Token {
            kind,
            position,
            comments: std::mem::take(&mut self.comments),
        }
    }

    fn invalid(&mut self, text: String, message: String, position: Position) -> Token {
        self.diagnostics.push(Diagnostic::syntax(message, position.clone()));
        self.token(TokenKind::Invalid(text), position)
    }

    fn scan_token(&mut self) -> Token {
        loop {
            self.bump_while(|c| c == ' ' || c == '\t' || c == '\r');
            if self.peek() == Some('#') {
                let comment = self.bump_while(|c| c != '\n');
                self.comments.push(comment.trim_end().to_string());
                continue;
            }
            break;
        }

        let start = self.here();
        let Some(c) = self.peek() else {
            return self.token(TokenKind::Eof, start);
        };

        match c {
            '\n' => {
                self.bump();
                self.token(TokenKind::Newline, start)
            }
            '{' => self.single(TokenKind::LBrace, start),
            '}' => self.single(TokenKind::RBrace, start),
            '[' => self.single(TokenKind::LBracket, start),
            ']' => self.single(TokenKind::RBracket, start),
            ':' => self.single(TokenKind::Colon, start),
            ',' => self.single(TokenKind::Comma, start),
            '=' => self.single(TokenKind::Equals, start),
            '-' => match self.peek_second() {
                Some('>') => {
                    self.bump();
                    self.bump();
                    self.token(TokenKind::Arrow, start)
                }
                Some(d) if d.is_ascii_digit() => self.scan_number(start),
                _ => {
                    self.bump();
                    self.invalid(
                        "-".to_string(),
                        "unexpected character '-' (expected '->' or a number)".to_string(),
                        start,
                    )
                }
            },
            '"' => self.scan_string(start),
            '/' => self.scan_path(start),
            '0'..='9' => self.scan_number(start),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let word = self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
                let kind = match word {
                    "true" => TokenKind::Boolean(true),
                    "false" => TokenKind::Boolean(false),
                    _ => TokenKind::Identifier(word.to_string()),
                };
                self.token(kind, start)
            }
            other => {
                self.bump();
                self.invalid(
                    other.to_string(),
                    format!("unexpected character {:?}", other),
                    start,
                )
            }
        }
    }

    fn single(&mut self, kind: TokenKind, start: Position) -> Token {
        self.bump();
        self.token(kind, start)
    }

    fn scan_number(&mut self, start: Position) -> Token {
        let from = self.offset;
        if self.peek() == Some('-') {
            self.bump();
        }
        self.bump_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }
        let lexeme = self.source[from..self.offset].to_string();
        self.token(TokenKind::Number(lexeme), start)
    }

    fn scan_string(&mut self, start: Position) -> Token {
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return self.invalid(
                        format!("\"{}", value),
                        "unterminated string literal".to_string(),
                        start,
                    );
                }
                Some('"') => {
                    self.bump();
                    return self.token(TokenKind::String(value), start);
                }
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        // Unknown escapes are kept literally; the closing-quote
                        // checks above still see a trailing newline or EOF.
                        Some(other) if other != '\n' => {
                            value.push('\\');
                            value.push(other);
                        }
                        _ => continue,
                    }
                    self.bump();
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }
    }

    /// Paths run to the next whitespace, an unbalanced `}`, or `->`.
    fn scan_path(&mut self, start: Position) -> Token {
        let from = self.offset;
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            if c.is_whitespace() || self.rest().starts_with("->") {
                break;
            }
            match c {
                '{' => depth += 1,
                '}' if depth == 0 => break,
                '}' => depth -= 1,
                _ => {}
            }
            self.bump();
        }
        let path = self.source[from..self.offset].to_string();
        self.token(TokenKind::Path(path), start)
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.scan_token();
        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        trace!(kind = ?token.kind, line = token.position.line, "token");
        Some(token)
    }
}

/// Scan a whole source into a token vector, returning the scanner diagnostics alongside.
pub fn tokenize(file: Arc<str>, source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut scanner = Scanner::new(file, source);
    let tokens: Vec<Token> = scanner.by_ref().collect();
    (tokens, scanner.take_diagnostics())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(Arc::from("test.sdl"), source)
            .0
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn scans_block_header_and_action() {
        assert_eq!(
            kinds("service \"api\" {\n  GET /users/{id} -> Users.Get\n}"),
            vec![
                TokenKind::Identifier("service".into()),
                TokenKind::String("api".into()),
                TokenKind::LBrace,
                TokenKind::Newline,
                TokenKind::Identifier("GET".into()),
                TokenKind::Path("/users/{id}".into()),
                TokenKind::Arrow,
                TokenKind::Identifier("Users.Get".into()),
                TokenKind::Newline,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn path_stops_at_unbalanced_brace() {
        assert_eq!(
            kinds("{ GET /x}"),
            vec![
                TokenKind::LBrace,
                TokenKind::Identifier("GET".into()),
                TokenKind::Path("/x".into()),
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers_booleans_and_arrows() {
        assert_eq!(
            kinds("-12.5 true false -> 3"),
            vec![
                TokenKind::Number("-12.5".into()),
                TokenKind::Boolean(true),
                TokenKind::Boolean(false),
                TokenKind::Arrow,
                TokenKind::Number("3".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes_are_unescaped() {
        assert_eq!(
            kinds(r#""a \"quoted\" \\ line\n""#),
            vec![
                TokenKind::String("a \"quoted\" \\ line\n".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_attach_to_following_token() {
        let (tokens, _) = tokenize(Arc::from("t.sdl"), "a = 1 # trailing\n# own line\nb");
        let newline = &tokens[3];
        assert_eq!(newline.kind, TokenKind::Newline);
        assert_eq!(newline.comments, vec!["# trailing".to_string()]);
        let second_newline = &tokens[4];
        assert_eq!(second_newline.comments, vec!["# own line".to_string()]);
        assert!(tokens[5].comments.is_empty());
    }

    #[test]
    fn invalid_characters_are_reported_and_skipped() {
        let (tokens, diagnostics) = tokenize(Arc::from("t.sdl"), "a @ b $");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Invalid("@".into()),
                TokenKind::Identifier("b".into()),
                TokenKind::Invalid("$".into()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].position.column, 3);
        assert_eq!(diagnostics[1].position.column, 7);
    }

    #[test]
    fn unterminated_string_does_not_swallow_next_line() {
        let (tokens, diagnostics) = tokenize(Arc::from("t.sdl"), "x = \"open\ny = 1");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "unterminated string literal");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Identifier("y".into())));
    }

    #[test]
    fn positions_are_one_based() {
        let (tokens, _) = tokenize(Arc::from("t.sdl"), "a\n  \"é\" c");
        assert_eq!((tokens[0].position.line, tokens[0].position.column), (1, 1));
        assert_eq!((tokens[2].position.line, tokens[2].position.column), (2, 3));
        // columns count characters, offsets count bytes
        assert_eq!(tokens[3].position.column, 7);
        assert_eq!(tokens[3].position.offset, 9);
    }

    #[test]
    fn scanner_can_be_restarted_from_a_snapshot() {
        let mut scanner = Scanner::new(Arc::from("t.sdl"), "a b c");
        scanner.next();
        let snapshot = scanner.clone();
        let rest: Vec<_> = scanner.map(|t| t.kind).collect();
        let again: Vec<_> = snapshot.map(|t| t.kind).collect();
        assert_eq!(rest, again);
        assert_eq!(rest.len(), 3);
    }
}
