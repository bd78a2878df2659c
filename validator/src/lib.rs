//! Semantic validation of parsed SDL documents against the built-in schema.

pub mod environment;
pub mod report;
pub mod rule_set;
pub mod rules;
pub mod schema;

pub use report::{FileReport, validate_paths, validate_source};
pub use rule_set::{RuleFn, Validator};
