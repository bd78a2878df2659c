//! Width-driven layout decisions: how actions are grouped and when a list or map
//! value breaks onto several lines.

use crate::ast::{ActionStatement, Block, MapEntry, Scalar, Value};
use crate::printer::{ActionStyle, INDENT, PrintConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionLayout {
    /// Each action on its own line directly inside the block.
    Single,
    /// Actions wrapped in a nested `actions { ... }` group.
    Multi,
}

pub(crate) fn indent(depth: usize) -> String {
    INDENT.repeat(depth)
}

pub(crate) fn indent_width(depth: usize) -> usize {
    INDENT.len() * depth
}

/// Decide the layout for `block`'s actions when the block itself sits at `depth`.
///
/// Under `auto`, the widest single-style action line (indentation included) is
/// compared against the limit: at or under it stays single, over it goes multi.
/// A limit of 0 means no limit.
pub fn action_layout(block: &Block, depth: usize, config: &PrintConfig) -> ActionLayout {
    match config.action_style {
        ActionStyle::Single => ActionLayout::Single,
        ActionStyle::Multi => ActionLayout::Multi,
        ActionStyle::Auto => {
            if config.action_line_limit == 0 {
                return ActionLayout::Single;
            }
            let widest = block
                .actions
                .iter()
                .map(|action| single_action_width(action, depth))
                .max()
                .unwrap_or(0);
            if widest <= config.action_line_limit {
                ActionLayout::Single
            } else {
                ActionLayout::Multi
            }
        }
    }
}

/// Width of `action` rendered single style inside a block at `depth`.
pub fn single_action_width(action: &ActionStatement, depth: usize) -> usize {
    indent_width(depth + 1) + render_action(action).chars().count()
}

/// `METHOD target -> handler`, without comments.
pub fn render_action(action: &ActionStatement) -> String {
    let target = if is_bare_path(&action.target) {
        action.target.clone()
    } else {
        quote(&action.target)
    };
    let handler = if is_identifier(&action.handler) {
        action.handler.clone()
    } else {
        quote(&action.handler)
    };
    format!("{} {} -> {}", action.method, target, handler)
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Render `value` starting at character `column` on a line indented `depth` levels.
/// Continuation lines are indented relative to `depth`; no trailing newline.
pub fn render_value(value: &Value, depth: usize, column: usize, limit: usize) -> String {
    match value {
        Value::Scalar(scalar) => render_scalar(scalar),
        Value::List(items) if items.is_empty() => "[]".to_string(),
        Value::Map(entries) if entries.is_empty() => "{}".to_string(),
        Value::List(items) => match inline_fitting(value, column, limit) {
            Some(inline) => inline,
            None => render_list_broken(items, depth, limit),
        },
        Value::Map(entries) => match inline_fitting(value, column, limit) {
            Some(inline) => inline,
            None => render_map_broken(entries, depth, limit),
        },
    }
}

fn inline_fitting(value: &Value, column: usize, limit: usize) -> Option<String> {
    let inline = render_inline(value)?;
    if limit == 0 || column + inline.chars().count() <= limit {
        Some(inline)
    } else {
        None
    }
}

/// Single-line rendering, only for containers whose elements are all scalars.
fn render_inline(value: &Value) -> Option<String> {
    match value {
        Value::Scalar(scalar) => Some(render_scalar(scalar)),
        Value::List(items) => {
            if items.iter().any(Value::is_container) {
                return None;
            }
            let parts: Vec<String> = items.iter().filter_map(render_inline).collect();
            Some(format!("[{}]", parts.join(", ")))
        }
        Value::Map(entries) => {
            if entries.iter().any(|e| e.value.is_container()) {
                return None;
            }
            let parts: Vec<String> = entries
                .iter()
                .filter_map(|e| render_inline(&e.value).map(|v| format!("{} = {}", e.key, v)))
                .collect();
            Some(format!("{{ {} }}", parts.join(", ")))
        }
    }
}

fn render_list_broken(items: &[Value], depth: usize, limit: usize) -> String {
    let inner = indent(depth + 1);
    let mut out = String::from("[\n");
    for item in items {
        out.push_str(&inner);
        out.push_str(&render_value(item, depth + 1, indent_width(depth + 1), limit));
        out.push_str(",\n");
    }
    out.push_str(&indent(depth));
    out.push(']');
    out
}

fn render_map_broken(entries: &[MapEntry], depth: usize, limit: usize) -> String {
    let inner = indent(depth + 1);
    let mut out = String::from("{\n");
    for entry in entries {
        let column = indent_width(depth + 1) + entry.key.chars().count() + 3;
        out.push_str(&inner);
        out.push_str(&entry.key);
        out.push_str(" = ");
        out.push_str(&render_value(&entry.value, depth + 1, column, limit));
        out.push('\n');
    }
    out.push_str(&indent(depth));
    out.push('}');
    out
}

pub fn render_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::String(s) => quote(s),
        Scalar::Number(lexeme) => lexeme.clone(),
        Scalar::Boolean(b) => b.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Lexical helpers
// ---------------------------------------------------------------------------

pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// True when `s` scans back as a single identifier token.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        && s != "true"
        && s != "false"
}

/// True when `s` scans back as a single path token.
pub fn is_bare_path(s: &str) -> bool {
    if !s.starts_with('/') || s.contains("->") || s.chars().any(char::is_whitespace) {
        return false;
    }
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '{' => depth += 1,
            '}' if depth == 0 => return false,
            '}' => depth -= 1,
            _ => {}
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn action(target: &str) -> ActionStatement {
        ActionStatement::new("GET", target, "H", Position::default())
    }

    #[test]
    fn bare_paths_and_quoted_targets() {
        assert_eq!(render_action(&action("/users/{id}")), "GET /users/{id} -> H");
        assert_eq!(render_action(&action("/a b")), "GET \"/a b\" -> H");
        assert_eq!(render_action(&action("/x}")), "GET \"/x}\" -> H");
        assert_eq!(render_action(&action("users")), "GET \"users\" -> H");
    }

    #[test]
    fn handlers_that_are_not_identifiers_are_quoted() {
        let mut a = action("/x");
        a.handler = "true".into();
        assert_eq!(render_action(&a), "GET /x -> \"true\"");
        a.handler = "pkg.Handler_2".into();
        assert_eq!(render_action(&a), "GET /x -> pkg.Handler_2");
    }

    #[test]
    fn scalar_lists_stay_inline_until_the_limit() {
        let value = Value::List(vec![Value::string("a"), Value::number("1")]);
        // `["a", 1]` is 8 characters
        assert_eq!(render_value(&value, 0, 10, 18), "[\"a\", 1]");
        assert_eq!(render_value(&value, 0, 10, 17), "[\n  \"a\",\n  1,\n]");
        assert_eq!(render_value(&value, 0, 500, 0), "[\"a\", 1]");
    }

    #[test]
    fn nested_containers_always_break() {
        let value = Value::Map(vec![MapEntry {
            key: "inner".into(),
            value: Value::List(vec![Value::boolean(true)]),
            position: Position::default(),
        }]);
        assert_eq!(render_value(&value, 1, 0, 0), "{\n    inner = [true]\n  }");
    }

    #[test]
    fn quote_escapes_specials() {
        assert_eq!(quote("a\"b\\c\nd"), r#""a\"b\\c\nd""#);
    }
}
