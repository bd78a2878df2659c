//! Canonical text rendering of a [`Document`].
//!
//! Printing never fails and is idempotent: parsing the output and printing it again
//! under the same [`PrintConfig`] yields the same bytes.

pub mod layout;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::ast::{ActionStatement, Attribute, Block, Document};
use crate::error::ConfigError;
use crate::parser::ACTIONS_GROUP;

pub use layout::{ActionLayout, action_layout};

use layout::{indent, indent_width, quote, render_action, render_value};

pub(crate) const INDENT: &str = "  ";

/// Default `action_line_limit`.
pub const DEFAULT_LINE_LIMIT: usize = 100;

/// How a block's actions are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStyle {
    /// One action per line directly in the block.
    Single,
    /// Actions grouped under `actions { ... }`.
    Multi,
    /// Per block: single unless the widest action line exceeds the limit.
    #[default]
    Auto,
}

impl FromStr for ActionStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(ActionStyle::Single),
            "multi" => Ok(ActionStyle::Multi),
            "auto" => Ok(ActionStyle::Auto),
            other => Err(ConfigError::InvalidActionStyle(other.to_string())),
        }
    }
}

impl fmt::Display for ActionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionStyle::Single => "single",
            ActionStyle::Multi => "multi",
            ActionStyle::Auto => "auto",
        })
    }
}

/// Immutable printer configuration, passed explicitly to every print call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintConfig {
    pub action_style: ActionStyle,
    /// Character width limit for `auto` actions and inline lists/maps. 0 disables it.
    pub action_line_limit: usize,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            action_style: ActionStyle::Auto,
            action_line_limit: DEFAULT_LINE_LIMIT,
        }
    }
}

impl PrintConfig {
    pub fn new(action_style: ActionStyle, action_line_limit: usize) -> Self {
        PrintConfig {
            action_style,
            action_line_limit,
        }
    }
}

/// Render `document` in canonical form. A document with no blocks and no comments
/// prints as the empty string; anything else ends with exactly one newline.
pub fn print_document(document: &Document, config: &PrintConfig) -> String {
    let mut printer = Printer::new(config);
    printer.document(document);
    printer.finish()
}

pub struct Printer<'c> {
    config: &'c PrintConfig,
    out: String,
}

impl<'c> Printer<'c> {
    pub fn new(config: &'c PrintConfig) -> Self {
        Printer {
            config,
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, depth: usize, text: &str) {
        self.out.push_str(&indent(depth));
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank_line(&mut self) {
        self.out.push('\n');
    }

    fn comments(&mut self, comments: &[String], depth: usize) {
        for comment in comments {
            self.line(depth, comment);
        }
    }

    pub fn document(&mut self, document: &Document) {
        for (i, block) in document.blocks.iter().enumerate() {
            if i > 0 {
                self.blank_line();
            }
            self.block(block, 0);
        }
        if !document.trailing_comments.is_empty() {
            if !document.blocks.is_empty() {
                self.blank_line();
            }
            self.comments(&document.trailing_comments, 0);
        }
    }

    // -----------------------------------------------------------------------
    // Blocks
    // -----------------------------------------------------------------------

    fn block(&mut self, block: &Block, depth: usize) {
        self.comments(&block.comments, depth);

        let header = match &block.label {
            Some(label) => format!("{} {}", block.kind, quote(label)),
            None => block.kind.clone(),
        };
        if !block.has_body() {
            self.line(depth, &format!("{} {{}}", header));
            return;
        }
        self.line(depth, &format!("{} {{", header));

        let mut wrote_section = false;
        for attribute in &block.attributes {
            self.attribute(attribute, depth + 1);
            wrote_section = true;
        }

        if !block.actions.is_empty() {
            if wrote_section {
                self.blank_line();
            }
            self.actions(block, depth);
            wrote_section = true;
        }

        for child in &block.blocks {
            if wrote_section {
                self.blank_line();
            }
            self.block(child, depth + 1);
            wrote_section = true;
        }

        self.comments(&block.trailing_comments, depth + 1);
        self.line(depth, "}");
    }

    fn attribute(&mut self, attribute: &Attribute, depth: usize) {
        self.comments(&attribute.comments, depth);
        let column = indent_width(depth) + attribute.key.chars().count() + 3;
        let value = render_value(
            &attribute.value,
            depth,
            column,
            self.config.action_line_limit,
        );
        let text = format!("{} = {}", attribute.key, value);
        self.line(depth, &with_trailing(text, attribute.trailing_comment.as_deref()));
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Actions of `block`, which itself sits at `depth`.
    fn actions(&mut self, block: &Block, depth: usize) {
        match action_layout(block, depth, self.config) {
            ActionLayout::Single => {
                for action in &block.actions {
                    self.action(action, depth + 1);
                }
            }
            ActionLayout::Multi => {
                self.line(depth + 1, &format!("{} {{", ACTIONS_GROUP));
                for action in &block.actions {
                    self.action(action, depth + 2);
                }
                self.line(depth + 1, "}");
            }
        }
    }

    fn action(&mut self, action: &ActionStatement, depth: usize) {
        self.comments(&action.comments, depth);
        let text = render_action(action);
        self.line(depth, &with_trailing(text, action.trailing_comment.as_deref()));
    }
}

fn with_trailing(text: String, comment: Option<&str>) -> String {
    match comment {
        Some(comment) => format!("{} {}", text, comment),
        None => text,
    }
}
