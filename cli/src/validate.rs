use std::path::PathBuf;

use sdl::BatchOptions;
use tracing::info;
use validator::Validator;

use crate::discovery::discover;
use crate::error::CliError;
use crate::render::Reporter;

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// File or directory to validate
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Worker threads (default: available parallelism)
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

pub fn run(args: &ValidateArgs, reporter: &mut Reporter) -> Result<i32, CliError> {
    let paths = discover(&args.path)?;
    info!(files = paths.len(), "validating");

    let options = BatchOptions {
        workers: args.jobs,
        cancel: None,
    };
    let mut errors = 0usize;
    let mut warnings = 0usize;

    for result in Validator::new().validate_paths(&paths, &options) {
        match result {
            Ok(report) => {
                reporter.emit(&report.path, &report.source, &report.diagnostics);
                errors += report.error_count();
                warnings += report.warning_count();
            }
            Err(error) => {
                reporter.emit_file_error(&error);
                errors += 1;
            }
        }
    }

    if errors > 0 {
        eprintln!("validation failed ({} errors, {} warnings)", errors, warnings);
        return Ok(1);
    }

    let mut summary = format!("{} file(s) valid", paths.len());
    if warnings > 0 {
        summary.push_str(&format!(" ({} warning(s))", warnings));
    }
    println!("{}", summary);
    Ok(0)
}
