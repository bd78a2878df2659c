use std::fmt;

use codespan_reporting::diagnostic::{Diagnostic as Codespan, Label};

use crate::position::Position;

/// Rule id shared by every diagnostic the scanner and parser produce.
pub const SYNTAX_RULE: &str = "syntax";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positioned, severity-tagged message from the parser or the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable identifier of the rule that produced this diagnostic.
    pub rule: &'static str,
    pub message: String,
    pub position: Position,
    /// Other locations involved, e.g. every earlier definition of a duplicate.
    pub related: Vec<Position>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(rule: &'static str, message: impl Into<String>, position: Position) -> Self {
        Diagnostic {
            severity: Severity::Error,
            rule,
            message: message.into(),
            position,
            related: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn warning(rule: &'static str, message: impl Into<String>, position: Position) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            rule,
            message: message.into(),
            position,
            related: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn syntax(message: impl Into<String>, position: Position) -> Self {
        Diagnostic::error(SYNTAX_RULE, message, position)
    }

    pub fn with_related(mut self, position: Position) -> Self {
        self.related.push(position);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Convert to a codespan-reporting diagnostic for terminal rendering.
    /// Related positions become secondary labels in the same file.
    pub fn to_codespan(&self, file_id: usize) -> Codespan<usize> {
        let severity = match self.severity {
            Severity::Error => codespan_reporting::diagnostic::Severity::Error,
            Severity::Warning => codespan_reporting::diagnostic::Severity::Warning,
        };
        let offset = self.position.offset;
        let mut labels = vec![Label::primary(file_id, offset..offset)];
        labels.extend(self.related.iter().map(|related| {
            Label::secondary(file_id, related.offset..related.offset).with_message("also here")
        }));
        Codespan::new(severity)
            .with_code(self.rule)
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}[{}]: {}",
            self.position, self.severity, self.rule, self.message
        )
    }
}

/// Sort by (file, line, column, rule id). The sort is stable, so diagnostics that
/// tie on all four keep the order they were produced in.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.position
            .sort_key()
            .cmp(&b.position.sort_key())
            .then_with(|| a.rule.cmp(b.rule))
    });
}

pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}
