use crate::ast::{ActionStatement, Attribute, Block, Document};
use crate::diagnostic::Diagnostic;
use crate::parser::state::{ParseState, Parsed, Recover};
use crate::scanner::{Token, TokenKind};

/// Keyword of the `actions { ... }` wrapper.
pub(crate) const ACTIONS_GROUP: &str = "actions";
/// Key of the `action = GET /x -> H` spelling.
const ACTION_ATTRIBUTE: &str = "action";

impl<I: Iterator<Item = Token>> ParseState<I> {
    // ------------------------------------------------------------------
    // Document
    // ------------------------------------------------------------------

    pub(super) fn parse_document(mut self) -> (Document, Vec<Diagnostic>) {
        let mut document = Document::new(self.file.clone());

        loop {
            self.skip_newlines();
            match self.peek_kind() {
                TokenKind::Eof => {
                    self.bump();
                    break;
                }
                TokenKind::Identifier(_) => match self.parse_block() {
                    Ok(block) => {
                        document.blocks.push(block);
                        if self.end_statement().is_err() {
                            self.synchronize();
                        }
                    }
                    Err(Recover) => self.synchronize(),
                },
                TokenKind::RBrace => {
                    let stray = self.bump();
                    self.error_at("unexpected '}' with no open block", stray.position);
                }
                _ => {
                    self.expected("a block");
                    self.bump();
                    self.synchronize();
                }
            }
        }

        document.trailing_comments = self.take_comments();
        (document, self.diagnostics)
    }

    // ------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------

    fn parse_block(&mut self) -> Parsed<Block> {
        let (kind, position) = self.expect_identifier("a block kind")?;
        let comments = self.take_comments();

        let label = match self.peek_kind() {
            TokenKind::String(label) => {
                let label = label.clone();
                self.bump();
                Some(label)
            }
            _ => None,
        };

        if !self.at(&TokenKind::LBrace) {
            return Err(self.expected(&format!("'{{' to open block `{}`", kind)));
        }
        self.bump();

        let mut block = Block::new(kind, label, position);
        block.comments = comments;
        self.parse_block_body(&mut block);
        Ok(block)
    }

    fn parse_block_body(&mut self, block: &mut Block) {
        loop {
            self.skip_newlines();
            match self.peek_kind() {
                TokenKind::RBrace => {
                    self.bump();
                    break;
                }
                TokenKind::Eof => {
                    self.error_at(
                        format!("unclosed block `{}`: expected '}}'", block),
                        block.position.clone(),
                    );
                    break;
                }
                TokenKind::Identifier(_) => {
                    if self.parse_statement(block).is_err() {
                        self.synchronize();
                    }
                }
                _ => {
                    self.expected("an attribute, action, or block");
                    self.bump();
                    self.synchronize();
                }
            }
        }
        block.trailing_comments = self.take_comments();
    }

    /// Dispatch on the token after the leading identifier.
    fn parse_statement(&mut self, block: &mut Block) -> Parsed<()> {
        let name = match self.peek_kind() {
            TokenKind::Identifier(name) => name.clone(),
            _ => return Err(self.expected("a statement")),
        };

        if self.action_ahead() {
            let action = self.parse_action()?;
            block.actions.push(action);
            return self.end_statement();
        }

        match self.nth_kind(1) {
            TokenKind::LBrace if name == ACTIONS_GROUP => self.parse_action_group(block),
            TokenKind::LBrace | TokenKind::String(_) => {
                let child = self.parse_block()?;
                block.blocks.push(child);
                self.end_statement()
            }
            TokenKind::Equals | TokenKind::Colon => {
                if name == ACTION_ATTRIBUTE && matches!(self.nth_kind(2), TokenKind::Identifier(_)) {
                    self.bump();
                    self.bump();
                    let action = self.parse_action()?;
                    block.actions.push(action);
                } else {
                    let attribute = self.parse_attribute()?;
                    block.attributes.push(attribute);
                }
                self.end_statement()
            }
            _ => {
                self.bump();
                Err(self.expected(&format!(
                    "'=', '{{', or an action path after `{}`",
                    name
                )))
            }
        }
    }

    /// A statement must end at a newline, the enclosing `}`, or end of file.
    fn end_statement(&mut self) -> Parsed<()> {
        match self.peek_kind() {
            TokenKind::Newline | TokenKind::RBrace | TokenKind::Eof => Ok(()),
            _ => Err(self.expected("end of line")),
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    fn parse_attribute(&mut self) -> Parsed<Attribute> {
        let (key, position) = self.expect_identifier("an attribute name")?;
        let comments = self.take_comments();
        self.bump(); // `=` or `:`
        let value = self.parse_value()?;

        let mut attribute = Attribute::new(key, value, position);
        attribute.comments = comments;
        attribute.trailing_comment = self.take_trailing_comment();
        Ok(attribute)
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// `VERB /path -> Handler` or `VERB "target" -> Handler`.
    fn action_ahead(&mut self) -> bool {
        match self.nth_kind(1) {
            TokenKind::Path(_) => true,
            TokenKind::String(_) => matches!(self.nth_kind(2), TokenKind::Arrow),
            _ => false,
        }
    }

    fn parse_action(&mut self) -> Parsed<ActionStatement> {
        let (method, position) = self.expect_identifier("an action method")?;
        let comments = self.take_comments();

        let target = match self.peek_kind() {
            TokenKind::Path(target) | TokenKind::String(target) => {
                let target = target.clone();
                self.bump();
                target
            }
            _ => return Err(self.expected("an action path")),
        };

        self.expect(TokenKind::Arrow, "'->'")?;

        let handler = match self.peek_kind() {
            TokenKind::Identifier(handler) | TokenKind::String(handler) => {
                let handler = handler.clone();
                self.bump();
                handler
            }
            _ => return Err(self.expected("a handler name")),
        };

        let mut action = ActionStatement::new(method, target, handler, position);
        action.comments = comments;
        action.trailing_comment = self.take_trailing_comment();
        Ok(action)
    }

    /// `actions { ... }` contributes its statements to the owning block. Comments
    /// around the wrapper stay pending and attach to the nearest action.
    fn parse_action_group(&mut self, block: &mut Block) -> Parsed<()> {
        let open = self.bump();
        self.bump(); // `{`

        loop {
            self.skip_newlines();
            match self.peek_kind() {
                TokenKind::RBrace => {
                    self.bump();
                    break;
                }
                TokenKind::Eof => {
                    self.error_at(
                        format!("unclosed `{}` group: expected '}}'", ACTIONS_GROUP),
                        open.position,
                    );
                    return Ok(());
                }
                TokenKind::Identifier(_) => match self.parse_action() {
                    Ok(action) => {
                        block.actions.push(action);
                        if self.end_statement().is_err() {
                            self.synchronize();
                        }
                    }
                    Err(Recover) => self.synchronize(),
                },
                _ => {
                    self.expected("an action statement");
                    self.bump();
                    self.synchronize();
                }
            }
        }

        self.end_statement()
    }
}
