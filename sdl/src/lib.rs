//! SDL: scanner, parser, canonical printer and formatter for service definition files.

pub mod ast;
pub mod batch;
pub mod diagnostic;
pub mod error;
pub mod format;
pub mod parser;
pub mod position;
pub mod printer;
pub mod scanner;

pub use ast::{ActionStatement, Attribute, Block, Document, MapEntry, Scalar, Value};
pub use batch::{BatchOptions, CancelToken};
pub use diagnostic::{Diagnostic, Severity, has_errors, sort_diagnostics};
pub use error::{ConfigError, FileError};
pub use format::{FormatResult, format_file, format_files, format_source, read_source};
pub use parser::{Parser, parse};
pub use position::Position;
pub use printer::{ActionStyle, DEFAULT_LINE_LIMIT, PrintConfig, print_document};
