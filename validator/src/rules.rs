//! Built-in rules. Each is a pure `(Document) -> Vec<Diagnostic>` and never stops at
//! the first problem.

use std::collections::HashMap;

use sdl::{Block, Diagnostic, Document, MapEntry, Position, Value};

use crate::environment::walk_scoped;
use crate::schema::{BUILTIN, DEPENDS_ON, KNOWN_VERBS, ValueShape};

pub const EMPTY_DOCUMENT: &str = "empty-document";
pub const UNKNOWN_KIND: &str = "unknown-kind";
pub const MISPLACED_BLOCK: &str = "misplaced-block";
pub const MISSING_LABEL: &str = "missing-label";
pub const REQUIRED_ATTRIBUTE: &str = "required-attribute";
pub const UNKNOWN_ATTRIBUTE: &str = "unknown-attribute";
pub const ATTRIBUTE_TYPE: &str = "attribute-type";
pub const DUPLICATE_ATTRIBUTE: &str = "duplicate-attribute";
pub const DUPLICATE_KEY: &str = "duplicate-key";
pub const DUPLICATE_BLOCK: &str = "duplicate-block";
pub const UNRESOLVED_REFERENCE: &str = "unresolved-reference";
pub const SELF_REFERENCE: &str = "self-reference";
pub const UNEXPECTED_ACTIONS: &str = "unexpected-actions";
pub const UNKNOWN_VERB: &str = "unknown-verb";
pub const INVALID_PATH: &str = "invalid-path";
pub const DUPLICATE_ACTION: &str = "duplicate-action";

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// Visit every block depth first, with its parent.
fn walk<'a>(document: &'a Document, visit: &mut impl FnMut(&'a Block, Option<&'a Block>)) {
    fn level<'a>(
        blocks: &'a [Block],
        parent: Option<&'a Block>,
        visit: &mut impl FnMut(&'a Block, Option<&'a Block>),
    ) {
        for block in blocks {
            visit(block, parent);
            level(&block.blocks, Some(block), visit);
        }
    }
    level(&document.blocks, None, visit);
}

/// Run `check` on every block and collect what it reports.
fn per_block(
    document: &Document,
    mut check: impl FnMut(&Block, Option<&Block>, &mut Vec<Diagnostic>),
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    walk(document, &mut |block, parent| check(block, parent, &mut diagnostics));
    diagnostics
}

fn at(position: &Position) -> String {
    format!("{}:{}", position.line, position.column)
}

/// Strings listed under `depends_on`, if the attribute is a list.
fn dependencies(block: &Block) -> Option<(&Position, Vec<&str>)> {
    let attribute = block.attribute(DEPENDS_ON)?;
    match &attribute.value {
        Value::List(items) => Some((
            &attribute.position,
            items.iter().filter_map(Value::as_str).collect(),
        )),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Document and block structure
// ---------------------------------------------------------------------------

pub fn empty_document(document: &Document) -> Vec<Diagnostic> {
    if !document.is_empty() {
        return Vec::new();
    }
    vec![Diagnostic::warning(
        EMPTY_DOCUMENT,
        "document contains no blocks",
        Position::start_of(document.file.clone()),
    )]
}

pub fn unknown_kind(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, _, out| {
        if BUILTIN.kind(&block.kind).is_none() {
            out.push(Diagnostic::warning(
                UNKNOWN_KIND,
                format!("unknown block kind `{}`", block.kind),
                block.position.clone(),
            ));
        }
    })
}

pub fn misplaced_block(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, parent, out| {
        let Some(spec) = BUILTIN.kind(&block.kind) else {
            return;
        };
        let parent_kind = parent.map(|p| p.kind.as_str());
        if spec.placement.allows(parent_kind) {
            return;
        }
        let message = match parent_kind {
            Some(parent) => format!("`{}` blocks are not allowed inside `{}`", block.kind, parent),
            None => format!("`{}` blocks are not allowed at the top level", block.kind),
        };
        out.push(Diagnostic::error(MISPLACED_BLOCK, message, block.position.clone()));
    })
}

pub fn missing_label(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, _, out| {
        let requires_label = BUILTIN
            .kind(&block.kind)
            .is_some_and(|spec| spec.label_required);
        if requires_label && block.label.is_none() {
            out.push(Diagnostic::error(
                MISSING_LABEL,
                format!("`{}` blocks require a label", block.kind),
                block.position.clone(),
            ));
        }
    })
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

pub fn required_attribute(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, _, out| {
        let Some(spec) = BUILTIN.kind(&block.kind) else {
            return;
        };
        for required in spec.required_attributes() {
            if block.attribute(required.key).is_none() {
                out.push(Diagnostic::error(
                    REQUIRED_ATTRIBUTE,
                    format!("`{}` is missing required attribute `{}`", block, required.key),
                    block.position.clone(),
                ));
            }
        }
    })
}

pub fn unknown_attribute(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, _, out| {
        let Some(spec) = BUILTIN.kind(&block.kind) else {
            return;
        };
        for attribute in &block.attributes {
            if !spec.declares(&attribute.key) {
                out.push(Diagnostic::warning(
                    UNKNOWN_ATTRIBUTE,
                    format!("unknown attribute `{}` for `{}` blocks", attribute.key, block.kind),
                    attribute.position.clone(),
                ));
            }
        }
    })
}

pub fn attribute_type(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, _, out| {
        let Some(spec) = BUILTIN.kind(&block.kind) else {
            return;
        };
        for attribute in &block.attributes {
            let Some(expected) = spec.attribute(&attribute.key) else {
                continue;
            };
            if expected.shape.matches(&attribute.value) {
                continue;
            }
            let found = match (&attribute.value, expected.shape) {
                (Value::List(_), ValueShape::StringList) => "a list with non-string elements",
                (other, _) => other.describe(),
            };
            out.push(Diagnostic::error(
                ATTRIBUTE_TYPE,
                format!(
                    "attribute `{}` must be {}, found {}",
                    attribute.key,
                    expected.shape.describe(),
                    found
                ),
                attribute.position.clone(),
            ));
        }
    })
}

pub fn duplicate_attribute(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, _, out| {
        let mut first: HashMap<&str, &Position> = HashMap::new();
        for attribute in &block.attributes {
            match first.get(attribute.key.as_str()) {
                Some(&original) => out.push(
                    Diagnostic::error(
                        DUPLICATE_ATTRIBUTE,
                        format!(
                            "duplicate attribute `{}`, first defined at {}",
                            attribute.key,
                            at(original)
                        ),
                        attribute.position.clone(),
                    )
                    .with_related(original.clone()),
                ),
                None => {
                    first.insert(&attribute.key, &attribute.position);
                }
            }
        }
    })
}

pub fn duplicate_key(document: &Document) -> Vec<Diagnostic> {
    fn check_value(value: &Value, out: &mut Vec<Diagnostic>) {
        match value {
            Value::Scalar(_) => {}
            Value::List(items) => items.iter().for_each(|item| check_value(item, out)),
            Value::Map(entries) => {
                check_entries(entries, out);
                entries.iter().for_each(|entry| check_value(&entry.value, out));
            }
        }
    }

    fn check_entries(entries: &[MapEntry], out: &mut Vec<Diagnostic>) {
        let mut first: HashMap<&str, &Position> = HashMap::new();
        for entry in entries {
            match first.get(entry.key.as_str()) {
                Some(&original) => out.push(
                    Diagnostic::error(
                        DUPLICATE_KEY,
                        format!(
                            "duplicate map key `{}`, first defined at {}",
                            entry.key,
                            at(original)
                        ),
                        entry.position.clone(),
                    )
                    .with_related(original.clone()),
                ),
                None => {
                    first.insert(&entry.key, &entry.position);
                }
            }
        }
    }

    per_block(document, |block, _, out| {
        for attribute in &block.attributes {
            check_value(&attribute.value, out);
        }
    })
}

// ---------------------------------------------------------------------------
// Sibling blocks and references
// ---------------------------------------------------------------------------

/// One diagnostic per group of labeled siblings sharing a kind and label, placed
/// at the second definition and naming every position.
pub fn duplicate_block(document: &Document) -> Vec<Diagnostic> {
    fn check_siblings(blocks: &[Block], out: &mut Vec<Diagnostic>) {
        let mut groups: Vec<Vec<&Block>> = Vec::new();
        let mut index: HashMap<(&str, &str), usize> = HashMap::new();
        for block in blocks {
            let Some(label) = &block.label else {
                continue;
            };
            match index.get(&(block.kind.as_str(), label.as_str())) {
                Some(&i) => groups[i].push(block),
                None => {
                    index.insert((block.kind.as_str(), label.as_str()), groups.len());
                    groups.push(vec![block]);
                }
            }
        }

        for group in groups.iter().filter(|group| group.len() > 1) {
            let positions: Vec<String> = group.iter().map(|b| at(&b.position)).collect();
            let mut diagnostic = Diagnostic::error(
                DUPLICATE_BLOCK,
                format!("duplicate `{}` defined at {}", group[0], positions.join(", ")),
                group[1].position.clone(),
            );
            for (i, block) in group.iter().enumerate() {
                if i != 1 {
                    diagnostic = diagnostic.with_related(block.position.clone());
                }
            }
            out.push(diagnostic);
        }

        for block in blocks {
            check_siblings(&block.blocks, out);
        }
    }

    let mut diagnostics = Vec::new();
    check_siblings(&document.blocks, &mut diagnostics);
    diagnostics
}

pub fn unresolved_reference(document: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    walk_scoped(document, &mut |environment, block| {
        let Some((position, names)) = dependencies(block) else {
            return;
        };
        for name in names {
            if block.label.as_deref() == Some(name) {
                continue;
            }
            if environment.lookup(name).is_none() {
                diagnostics.push(Diagnostic::error(
                    UNRESOLVED_REFERENCE,
                    format!("`{}` depends on `{}`, which is not defined", block, name),
                    position.clone(),
                ));
            }
        }
    });
    diagnostics
}

pub fn self_reference(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, _, out| {
        let (Some(label), Some((position, names))) = (&block.label, dependencies(block)) else {
            return;
        };
        if names.contains(&label.as_str()) {
            out.push(Diagnostic::error(
                SELF_REFERENCE,
                format!("`{}` depends on itself", block),
                position.clone(),
            ));
        }
    })
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

pub fn unexpected_actions(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, _, out| {
        let rejects = BUILTIN
            .kind(&block.kind)
            .is_some_and(|spec| !spec.accepts_actions);
        if let (true, Some(first)) = (rejects, block.actions.first()) {
            out.push(Diagnostic::error(
                UNEXPECTED_ACTIONS,
                format!("`{}` blocks do not accept actions", block.kind),
                first.position.clone(),
            ));
        }
    })
}

pub fn unknown_verb(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, _, out| {
        for action in &block.actions {
            if !KNOWN_VERBS.contains(&action.method.as_str()) {
                out.push(
                    Diagnostic::warning(
                        UNKNOWN_VERB,
                        format!("unknown action method `{}`", action.method),
                        action.position.clone(),
                    )
                    .with_note(format!("known methods: {}", KNOWN_VERBS.join(", "))),
                );
            }
        }
    })
}

pub fn invalid_path(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, _, out| {
        for action in &block.actions {
            if !action.target.starts_with('/') {
                out.push(Diagnostic::error(
                    INVALID_PATH,
                    format!("action target `{}` must start with '/'", action.target),
                    action.position.clone(),
                ));
            }
        }
    })
}

pub fn duplicate_action(document: &Document) -> Vec<Diagnostic> {
    per_block(document, |block, _, out| {
        let mut first: HashMap<(&str, &str), &Position> = HashMap::new();
        for action in &block.actions {
            let key = (action.method.as_str(), action.target.as_str());
            match first.get(&key) {
                Some(&original) => out.push(
                    Diagnostic::error(
                        DUPLICATE_ACTION,
                        format!(
                            "duplicate action `{} {}`, first defined at {}",
                            action.method,
                            action.target,
                            at(original)
                        ),
                        action.position.clone(),
                    )
                    .with_related(original.clone()),
                ),
                None => {
                    first.insert(key, &action.position);
                }
            }
        }
    })
}
