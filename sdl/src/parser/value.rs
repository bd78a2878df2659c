use crate::ast::{MapEntry, Value};
use crate::parser::state::{ParseState, Parsed};
use crate::scanner::{Token, TokenKind};

impl<I: Iterator<Item = Token>> ParseState<I> {
    pub(super) fn parse_value(&mut self) -> Parsed<Value> {
        let value = match self.peek_kind() {
            TokenKind::String(s) => Value::string(s.clone()),
            TokenKind::Number(n) => Value::number(n.clone()),
            TokenKind::Boolean(b) => Value::boolean(*b),
            TokenKind::LBracket => return self.parse_list(),
            TokenKind::LBrace => return self.parse_map(),
            _ => return Err(self.expected("a value")),
        };
        self.bump();
        Ok(value)
    }

    /// `[a, b, c]`, newlines allowed anywhere between elements, trailing comma allowed.
    fn parse_list(&mut self) -> Parsed<Value> {
        self.bump(); // `[`
        self.open_values.push(TokenKind::RBracket);

        let mut items = Vec::new();
        loop {
            self.skip_newlines();
            if self.at(&TokenKind::RBracket) {
                break;
            }
            items.push(self.parse_value()?);
            self.skip_newlines();
            match self.peek_kind() {
                TokenKind::Comma => {
                    self.bump();
                }
                TokenKind::RBracket => break,
                _ => return Err(self.expected("',' or ']'")),
            }
        }

        self.bump(); // `]`
        self.open_values.pop();
        Ok(Value::List(items))
    }

    /// `{ key = value, ... }` with entries separated by commas or newlines.
    fn parse_map(&mut self) -> Parsed<Value> {
        self.bump(); // `{`
        self.open_values.push(TokenKind::RBrace);

        let mut entries = Vec::new();
        loop {
            while matches!(self.peek_kind(), TokenKind::Newline | TokenKind::Comma) {
                self.bump();
            }
            if self.at(&TokenKind::RBrace) {
                break;
            }

            let (key, position) = self.expect_identifier("a map key or '}'")?;
            if !matches!(self.peek_kind(), TokenKind::Equals | TokenKind::Colon) {
                return Err(self.expected(&format!("'=' after map key `{}`", key)));
            }
            self.bump();
            let value = self.parse_value()?;
            entries.push(MapEntry {
                key,
                value,
                position,
            });

            match self.peek_kind() {
                TokenKind::Newline | TokenKind::Comma | TokenKind::RBrace => {}
                _ => return Err(self.expected("',' or a new line between map entries")),
            }
        }

        self.bump(); // `}`
        self.open_values.pop();
        Ok(Value::Map(entries))
    }
}
