use std::fmt;

use sdl::{Diagnostic, Document, sort_diagnostics};
use tracing::trace;

use crate::rules;

/// A rule: a pure check over a whole document.
pub type RuleFn = dyn Fn(&Document) -> Vec<Diagnostic> + Send + Sync;

struct Rule {
    id: &'static str,
    check: Box<RuleFn>,
}

/// Ordered, extensible set of rules.
///
/// Every rule runs on every document; diagnostics are merged and sorted by
/// (file, line, column, rule id), so the output does not depend on rule order.
pub struct Validator {
    rules: Vec<Rule>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("rules", &self.rule_ids().collect::<Vec<_>>())
            .finish()
    }
}

impl Validator {
    /// The built-in rules against the built-in schema.
    pub fn new() -> Self {
        Validator::empty()
            .with_rule(rules::EMPTY_DOCUMENT, rules::empty_document)
            .with_rule(rules::UNKNOWN_KIND, rules::unknown_kind)
            .with_rule(rules::MISPLACED_BLOCK, rules::misplaced_block)
            .with_rule(rules::MISSING_LABEL, rules::missing_label)
            .with_rule(rules::REQUIRED_ATTRIBUTE, rules::required_attribute)
            .with_rule(rules::UNKNOWN_ATTRIBUTE, rules::unknown_attribute)
            .with_rule(rules::ATTRIBUTE_TYPE, rules::attribute_type)
            .with_rule(rules::DUPLICATE_ATTRIBUTE, rules::duplicate_attribute)
            .with_rule(rules::DUPLICATE_KEY, rules::duplicate_key)
            .with_rule(rules::DUPLICATE_BLOCK, rules::duplicate_block)
            .with_rule(rules::UNRESOLVED_REFERENCE, rules::unresolved_reference)
            .with_rule(rules::SELF_REFERENCE, rules::self_reference)
            .with_rule(rules::UNEXPECTED_ACTIONS, rules::unexpected_actions)
            .with_rule(rules::UNKNOWN_VERB, rules::unknown_verb)
            .with_rule(rules::INVALID_PATH, rules::invalid_path)
            .with_rule(rules::DUPLICATE_ACTION, rules::duplicate_action)
    }

    /// A validator with no rules.
    pub fn empty() -> Self {
        Validator { rules: Vec::new() }
    }

    /// Append a rule. It runs after every rule added before it.
    pub fn with_rule<F>(mut self, id: &'static str, check: F) -> Self
    where
        F: Fn(&Document) -> Vec<Diagnostic> + Send + Sync + 'static,
    {
        self.rules.push(Rule {
            id,
            check: Box::new(check),
        });
        self
    }

    pub fn rule_ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.id)
    }

    /// Run every rule. Never mutates the document and never stops early.
    pub fn validate(&self, document: &Document) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for rule in &self.rules {
            let found = (rule.check)(document);
            trace!(rule = rule.id, found = found.len(), "rule finished");
            diagnostics.extend(found);
        }
        sort_diagnostics(&mut diagnostics);
        diagnostics
    }
}
