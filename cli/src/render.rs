use std::path::Path;

use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use sdl::{Diagnostic, FileError};

/// Renders diagnostics to stderr with source snippets.
pub struct Reporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl Reporter {
    pub fn new(no_color: bool) -> Self {
        let color_choice = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Reporter {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(color_choice),
            config: term::Config::default(),
        }
    }

    pub fn emit(&mut self, path: &Path, source: &str, diagnostics: &[Diagnostic]) {
        if diagnostics.is_empty() {
            return;
        }
        let file_id = self
            .files
            .add(path.display().to_string(), source.to_string());
        for diagnostic in diagnostics {
            let diagnostic = diagnostic.to_codespan(file_id);
            let _ = term::emit_to_write_style(
                &mut self.writer.lock(),
                &self.config,
                &self.files,
                &diagnostic,
            );
        }
    }

    /// Syntax errors render with snippets; other failures as a single line.
    pub fn emit_file_error(&mut self, error: &FileError) {
        match error {
            FileError::Syntax {
                path,
                source_text,
                diagnostics,
            } => self.emit(path, source_text, diagnostics),
            other => eprintln!("error: {}", other),
        }
    }
}
