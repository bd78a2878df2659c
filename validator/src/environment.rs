use std::collections::HashMap;

use sdl::{Block, Document};

/// Labeled blocks visible at one nesting level: the children of one parent, or the
/// top-level blocks of the document.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    labels: HashMap<&'a str, &'a Block>,
}

impl<'a> Scope<'a> {
    pub fn new(siblings: &'a [Block]) -> Self {
        let mut labels = HashMap::new();
        for block in siblings {
            if let Some(label) = &block.label {
                // first definition wins; later ones are duplicates
                labels.entry(label.as_str()).or_insert(block);
            }
        }
        Scope { labels }
    }

    pub fn get(&self, label: &str) -> Option<&'a Block> {
        self.labels.get(label).copied()
    }
}

/// Stack of sibling scopes from the top level down to the block being checked.
/// A label resolves if it names a sibling or a sibling of any ancestor.
#[derive(Debug, Default)]
pub struct Environment<'a> {
    scopes: Vec<Scope<'a>>,
}

impl<'a> Environment<'a> {
    pub fn new() -> Self {
        Environment { scopes: Vec::new() }
    }

    pub fn push_scope(&mut self, scope: Scope<'a>) {
        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) -> Option<Scope<'a>> {
        self.scopes.pop()
    }

    /// Look a label up, searching from the innermost scope outward.
    pub fn lookup(&self, label: &str) -> Option<&'a Block> {
        self.scopes.iter().rev().find_map(|scope| scope.get(label))
    }
}

/// Visit every block with the environment of labels visible from it.
pub fn walk_scoped<'a>(document: &'a Document, visit: &mut impl FnMut(&Environment<'a>, &'a Block)) {
    let mut environment = Environment::new();
    walk_level(&document.blocks, &mut environment, visit);
}

fn walk_level<'a>(
    blocks: &'a [Block],
    environment: &mut Environment<'a>,
    visit: &mut impl FnMut(&Environment<'a>, &'a Block),
) {
    environment.push_scope(Scope::new(blocks));
    for block in blocks {
        visit(environment, block);
        walk_level(&block.blocks, environment, visit);
    }
    environment.pop_scope();
}
