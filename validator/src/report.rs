use std::path::{Path, PathBuf};

use sdl::{BatchOptions, Diagnostic, Document, FileError, Severity, batch, has_errors, read_source};
use tracing::debug;

use crate::rule_set::Validator;

/// Everything validation found in one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub source: String,
    /// `None` when the file has syntax errors; rules only run on parsed documents.
    pub document: Option<Document>,
    /// Syntax diagnostics, or rule diagnostics, sorted by position.
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        has_errors(&self.diagnostics)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl Validator {
    pub fn validate_source(&self, path: impl AsRef<Path>, source: &str) -> FileReport {
        let path = path.as_ref();
        let (document, syntax) = sdl::parse(&*path.to_string_lossy(), source);

        let (document, diagnostics) = if has_errors(&syntax) {
            (None, syntax)
        } else {
            let diagnostics = self.validate(&document);
            (Some(document), diagnostics)
        };
        debug!(
            path = %path.display(),
            diagnostics = diagnostics.len(),
            parsed = document.is_some(),
            "validated"
        );

        FileReport {
            path: path.to_path_buf(),
            source: source.to_string(),
            document,
            diagnostics,
        }
    }

    pub fn validate_file(&self, path: &Path) -> Result<FileReport, FileError> {
        let source = read_source(path)?;
        Ok(self.validate_source(path, &source))
    }

    /// Validate every file on the worker pool. Results are in input order.
    pub fn validate_paths(
        &self,
        paths: &[PathBuf],
        options: &BatchOptions,
    ) -> Vec<Result<FileReport, FileError>> {
        batch::run(paths, options, |path| self.validate_file(path))
    }
}

/// [`Validator::validate_source`] with the built-in rules.
pub fn validate_source(path: impl AsRef<Path>, source: &str) -> FileReport {
    Validator::new().validate_source(path, source)
}

/// [`Validator::validate_paths`] with the built-in rules.
pub fn validate_paths(
    paths: &[PathBuf],
    options: &BatchOptions,
) -> Vec<Result<FileReport, FileError>> {
    Validator::new().validate_paths(paths, options)
}
