//! Formatter orchestrator: source text in, canonical text plus a changed flag out.
//! Writing the result back or diffing it is left to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::batch::{self, BatchOptions};
use crate::diagnostic::has_errors;
use crate::error::FileError;
use crate::parser::parse;
use crate::printer::{PrintConfig, print_document};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    pub path: PathBuf,
    pub original: String,
    pub formatted: String,
    /// `formatted` differs from `original` byte for byte.
    pub changed: bool,
}

/// Read a source file, mapping failure to [`FileError::Io`].
pub fn read_source(path: &Path) -> Result<String, FileError> {
    fs::read_to_string(path).map_err(|source| {
        warn!(path = %path.display(), error = %source, "cannot read file");
        FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Parse and print `source`. A file with any syntax error is not printed; its
/// diagnostics come back in [`FileError::Syntax`].
pub fn format_source(
    path: impl AsRef<Path>,
    source: &str,
    config: &PrintConfig,
) -> Result<FormatResult, FileError> {
    let path = path.as_ref();
    let (document, diagnostics) = parse(&*path.to_string_lossy(), source);
    if has_errors(&diagnostics) {
        debug!(path = %path.display(), errors = diagnostics.len(), "not formatting");
        return Err(FileError::Syntax {
            path: path.to_path_buf(),
            source_text: source.to_string(),
            diagnostics,
        });
    }

    let formatted = print_document(&document, config);
    let changed = formatted != source;
    debug!(path = %path.display(), changed, "formatted");
    Ok(FormatResult {
        path: path.to_path_buf(),
        original: source.to_string(),
        formatted,
        changed,
    })
}

pub fn format_file(path: &Path, config: &PrintConfig) -> Result<FormatResult, FileError> {
    let source = read_source(path)?;
    format_source(path, &source, config)
}

/// Format every file on the worker pool. Results are in input order.
pub fn format_files(
    paths: &[PathBuf],
    config: &PrintConfig,
    options: &BatchOptions,
) -> Vec<Result<FormatResult, FileError>> {
    batch::run(paths, options, |path| format_file(path, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::ActionStyle;

    #[test]
    fn whitespace_only_difference_is_a_change() {
        let config = PrintConfig::new(ActionStyle::Single, 100);
        let result = format_source("a.sdl", "service \"a\" { action = GET /x -> H }", &config).unwrap();
        assert!(result.changed);
        assert_eq!(result.formatted, "service \"a\" {\n  GET /x -> H\n}\n");

        let again = format_source("a.sdl", &result.formatted, &config).unwrap();
        assert!(!again.changed);
    }

    #[test]
    fn syntax_errors_withhold_output() {
        let err = format_source("b.sdl", "service {\n  = 1\n}\n", &PrintConfig::default()).unwrap_err();
        let (path, source_text, diagnostics) = match err {
            FileError::Syntax {
                path,
                source_text,
                diagnostics,
            } => (path, source_text, diagnostics),
            other => panic!("expected a syntax error, got {:?}", other),
        };
        assert_eq!(path, PathBuf::from("b.sdl"));
        assert_eq!(source_text, "service {\n  = 1\n}\n");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(&*diagnostics[0].position.file, "b.sdl");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.sdl");
        let err = format_file(&missing, &PrintConfig::default()).unwrap_err();
        assert!(matches!(err, FileError::Io { .. }));
        assert_eq!(err.path(), missing.as_path());
    }
}
