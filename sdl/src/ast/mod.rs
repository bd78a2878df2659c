pub mod value;

use std::fmt;
use std::sync::Arc;

use crate::position::Position;

pub use value::{MapEntry, Scalar, Value};

/// A parsed SDL file: the ordered top-level blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Path of the source file, as given to the parser.
    pub file: Arc<str>,
    pub blocks: Vec<Block>,
    /// Comments after the last block.
    pub trailing_comments: Vec<String>,
}

impl Document {
    pub fn new(file: Arc<str>) -> Self {
        Document {
            file,
            blocks: Vec::new(),
            trailing_comments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Equality of blocks, attributes, values, actions and comments, ignoring
    /// every position and the file path.
    pub fn structurally_eq(&self, other: &Document) -> bool {
        self.clone().erase_positions() == other.clone().erase_positions()
    }

    fn erase_positions(mut self) -> Self {
        self.file = Arc::from("");
        self.blocks.iter_mut().for_each(Block::erase_positions);
        self
    }
}

/// A named, optionally labeled construct such as `service "api" { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: String,
    pub label: Option<String>,
    pub attributes: Vec<Attribute>,
    pub blocks: Vec<Block>,
    /// Action statements in written order, however they were spelled.
    pub actions: Vec<ActionStatement>,
    /// Comments directly above the block.
    pub comments: Vec<String>,
    /// Comments just before the closing brace.
    pub trailing_comments: Vec<String>,
    pub position: Position,
}

impl Block {
    pub fn new(kind: impl Into<String>, label: Option<String>, position: Position) -> Self {
        Block {
            kind: kind.into(),
            label,
            attributes: Vec::new(),
            blocks: Vec::new(),
            actions: Vec::new(),
            comments: Vec::new(),
            trailing_comments: Vec::new(),
            position,
        }
    }

    /// First attribute with the given key.
    pub fn attribute(&self, key: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.key == key)
    }

    pub fn has_body(&self) -> bool {
        !(self.attributes.is_empty()
            && self.blocks.is_empty()
            && self.actions.is_empty()
            && self.trailing_comments.is_empty())
    }

    fn erase_positions(&mut self) {
        self.position = Position::default();
        for attribute in &mut self.attributes {
            attribute.position = Position::default();
            attribute.value.erase_positions();
        }
        for action in &mut self.actions {
            action.position = Position::default();
        }
        self.blocks.iter_mut().for_each(Block::erase_positions);
    }
}

/// `service "api"` or `config`, as used in diagnostics.
impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} {:?}", self.kind, label),
            None => write!(f, "{}", self.kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub key: String,
    pub value: Value,
    pub comments: Vec<String>,
    /// A comment on the same line, after the value.
    pub trailing_comment: Option<String>,
    pub position: Position,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: Value, position: Position) -> Self {
        Attribute {
            key: key.into(),
            value,
            comments: Vec::new(),
            trailing_comment: None,
            position,
        }
    }
}

/// `GET /users/{id} -> Users.Get`
#[derive(Debug, Clone, PartialEq)]
pub struct ActionStatement {
    pub method: String,
    pub target: String,
    pub handler: String,
    pub comments: Vec<String>,
    pub trailing_comment: Option<String>,
    pub position: Position,
}

impl ActionStatement {
    pub fn new(
        method: impl Into<String>,
        target: impl Into<String>,
        handler: impl Into<String>,
        position: Position,
    ) -> Self {
        ActionStatement {
            method: method.into(),
            target: target.into(),
            handler: handler.into(),
            comments: Vec::new(),
            trailing_comment: None,
            position,
        }
    }
}
