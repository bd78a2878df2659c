use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::diagnostic::{Diagnostic, Severity};

/// Why a single file in a batch produced no result.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file has syntax errors and was not formatted. The source text is kept so
    /// the caller can render the diagnostics.
    #[error("{}: {} syntax error(s)", .path.display(), error_count(.diagnostics))]
    Syntax {
        path: PathBuf,
        source_text: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("{}: cancelled before processing", .path.display())]
    Cancelled { path: PathBuf },
}

impl FileError {
    pub fn path(&self) -> &Path {
        match self {
            FileError::Io { path, .. }
            | FileError::Syntax { path, .. }
            | FileError::Cancelled { path } => path,
        }
    }
}

fn error_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count()
}

/// Invalid formatter configuration. Raised before any file is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid --actions value: {0} (expected single|multi|auto)")]
    InvalidActionStyle(String),
}
