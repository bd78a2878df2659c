use std::collections::VecDeque;
use std::sync::Arc;

use crate::diagnostic::Diagnostic;
use crate::position::Position;
use crate::scanner::{Token, TokenKind};

/// Returned by a production that hit unexpected input. The diagnostic has already
/// been recorded; the caller decides where to resynchronise.
#[derive(Debug)]
pub(super) struct Recover;

pub(super) type Parsed<T> = Result<T, Recover>;

/// Parser state shared by the structural and value productions.
pub(super) struct ParseState<I: Iterator<Item = Token>> {
    tokens: I,
    lookahead: VecDeque<Token>,
    eof: Option<Token>,
    last_position: Position,
    pub(super) file: Arc<str>,
    pub(super) diagnostics: Vec<Diagnostic>,
    /// Comments absorbed from consumed tokens, waiting for a node to own them.
    pub(super) pending_comments: Vec<String>,
    /// Closers of the `[` / `{` value brackets currently open, innermost last, so
    /// recovery can skip past the rest of a broken value.
    pub(super) open_values: Vec<TokenKind>,
}

impl<I: Iterator<Item = Token>> ParseState<I> {
    pub(super) fn new(tokens: I, file: Arc<str>) -> Self {
        ParseState {
            tokens,
            lookahead: VecDeque::new(),
            eof: None,
            last_position: Position::start_of(file.clone()),
            file,
            diagnostics: Vec::new(),
            pending_comments: Vec::new(),
            open_values: Vec::new(),
        }
    }

    fn pull(&mut self) -> Token {
        match self.tokens.next() {
            Some(token) => {
                self.last_position = token.position.clone();
                if token.kind == TokenKind::Eof {
                    self.eof = Some(Token {
                        comments: Vec::new(),
                        ..token.clone()
                    });
                }
                token
            }
            None => self.eof.clone().unwrap_or_else(|| Token {
                kind: TokenKind::Eof,
                position: self.last_position.clone(),
                comments: Vec::new(),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Token access
    // ------------------------------------------------------------------

    pub(super) fn peek_nth(&mut self, n: usize) -> &Token {
        while self.lookahead.len() <= n {
            let token = self.pull();
            self.lookahead.push_back(token);
        }
        &self.lookahead[n]
    }

    pub(super) fn peek(&mut self) -> &Token {
        self.peek_nth(0)
    }

    pub(super) fn peek_kind(&mut self) -> &TokenKind {
        &self.peek_nth(0).kind
    }

    pub(super) fn nth_kind(&mut self, n: usize) -> &TokenKind {
        &self.peek_nth(n).kind
    }

    /// Consume the next token, moving its comments into the pending buffer.
    pub(super) fn bump(&mut self) -> Token {
        let mut token = match self.lookahead.pop_front() {
            Some(token) => token,
            None => self.pull(),
        };
        self.pending_comments.append(&mut token.comments);
        token
    }

    pub(super) fn at(&mut self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(super) fn skip_newlines(&mut self) {
        while self.at(&TokenKind::Newline) {
            self.bump();
        }
    }

    pub(super) fn take_comments(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_comments)
    }

    /// If the next token ends the current line and carries a comment, that comment
    /// was written after the statement just parsed.
    pub(super) fn take_trailing_comment(&mut self) -> Option<String> {
        let token = self.peek_nth(0);
        if token.kind != TokenKind::Newline || token.comments.is_empty() {
            return None;
        }
        let mut comments = std::mem::take(&mut self.lookahead[0].comments);
        let first = comments.remove(0);
        self.pending_comments.append(&mut comments);
        Some(first)
    }

    // ------------------------------------------------------------------
    // Errors and recovery
    // ------------------------------------------------------------------

    pub(super) fn error_at(&mut self, message: impl Into<String>, position: Position) {
        self.diagnostics.push(Diagnostic::syntax(message, position));
    }

    /// Record "expected X, found Y" at the next token. Invalid tokens were already
    /// reported by the scanner and are not reported twice.
    pub(super) fn expected(&mut self, what: &str) -> Recover {
        let token = self.peek().clone();
        if !matches!(token.kind, TokenKind::Invalid(_)) {
            self.error_at(format!("expected {}, found {}", what, token.kind), token.position);
        }
        Recover
    }

    pub(super) fn expect_identifier(&mut self, what: &str) -> Parsed<(String, Position)> {
        if let TokenKind::Identifier(name) = self.peek_kind() {
            let name = name.clone();
            let token = self.bump();
            return Ok((name, token.position));
        }
        Err(self.expected(what))
    }

    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> Parsed<Token> {
        if self.at(&kind) {
            Ok(self.bump())
        } else {
            Err(self.expected(what))
        }
    }

    /// Skip to the next statement boundary: a newline at the current nesting depth,
    /// or the `}` that closes the current block (left unconsumed). A closer that
    /// matches no open value bracket is never consumed as one.
    pub(super) fn synchronize(&mut self) {
        let mut open = std::mem::take(&mut self.open_values);
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return,
                TokenKind::Newline if open.is_empty() => return,
                TokenKind::LBrace => open.push(TokenKind::RBrace),
                TokenKind::LBracket => open.push(TokenKind::RBracket),
                closer @ (TokenKind::RBrace | TokenKind::RBracket) => {
                    match open.iter().rposition(|kind| kind == closer) {
                        Some(index) => open.truncate(index),
                        None if *closer == TokenKind::RBrace => return,
                        None => {}
                    }
                }
                _ => {}
            }
            self.bump();
        }
    }
}
