use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::ArgAction;
use sdl::{ActionStyle, BatchOptions, DEFAULT_LINE_LIMIT, PrintConfig, format_files};
use tracing::{info, warn};

use crate::config::FileConfig;
use crate::diff::unified_diff;
use crate::discovery::discover;
use crate::error::CliError;
use crate::render::Reporter;

/// Exit code when `--check` finds files that need reformatting.
pub const EXIT_NEEDS_FORMAT: i32 = 3;

#[derive(clap::Args)]
pub struct FmtArgs {
    /// File or directory to format
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// List files that would change, without writing
    #[arg(long)]
    pub check: bool,

    /// Print a unified diff of the changes (implies --write=false)
    #[arg(long)]
    pub diff: bool,

    /// Write formatted output back to the files
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub write: bool,

    /// Action layout: single, multi, or auto
    #[arg(long, value_name = "STYLE")]
    pub actions: Option<String>,

    /// Width limit for auto action layout and inline values (0 disables)
    #[arg(long, value_name = "N")]
    pub line_length: Option<usize>,

    /// Worker threads (default: available parallelism)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Config file (default: sdl.toml beside PATH)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl FmtArgs {
    /// Flags override the config file, which overrides defaults.
    fn resolve(&self) -> Result<(PrintConfig, BatchOptions), CliError> {
        let file = FileConfig::load(self.config.as_deref(), &self.path)?;
        let action_style = match &self.actions {
            Some(raw) => raw.parse::<ActionStyle>()?,
            None => file.fmt.actions.unwrap_or_default(),
        };
        let line_limit = self
            .line_length
            .or(file.fmt.line_length)
            .unwrap_or(DEFAULT_LINE_LIMIT);
        let options = BatchOptions {
            workers: self.jobs.or(file.fmt.jobs),
            cancel: None,
        };
        Ok((PrintConfig::new(action_style, line_limit), options))
    }
}

pub fn run(args: &FmtArgs, reporter: &mut Reporter) -> Result<i32, CliError> {
    let (config, options) = args.resolve()?;
    let write = args.write && !args.diff && !args.check;
    let paths = discover(&args.path)?;
    info!(
        files = paths.len(),
        style = %config.action_style,
        limit = config.action_line_limit,
        write,
        "formatting"
    );

    let mut out = Output::new(io::stdout().lock());
    let mut changed = 0usize;
    let mut failed = 0usize;

    for result in format_files(&paths, &config, &options) {
        let result = match result {
            Ok(result) => result,
            Err(error) => {
                failed += 1;
                reporter.emit_file_error(&error);
                continue;
            }
        };
        if !result.changed {
            continue;
        }
        changed += 1;

        if args.diff {
            out.print(&unified_diff(&result.path, &result.original, &result.formatted));
        } else if args.check {
            out.print(&format!("{}\n", result.path.display()));
        }

        if write {
            if let Err(source) = fs::write(&result.path, &result.formatted) {
                warn!(path = %result.path.display(), "write failed");
                failed += 1;
                eprintln!(
                    "error: {}",
                    CliError::Write {
                        path: result.path.clone(),
                        source,
                    }
                );
            }
        }
    }

    out.flush();

    if args.check && changed > 0 {
        eprintln!("{} file(s) would be reformatted", changed);
        return Ok(EXIT_NEEDS_FORMAT);
    }
    Ok(if failed > 0 { 1 } else { 0 })
}

/// Report output on stdout. The first write error (usually a closed pipe) is
/// logged and later output is dropped; file processing carries on.
struct Output<W: Write> {
    inner: Option<W>,
}

impl<W: Write> Output<W> {
    fn new(inner: W) -> Self {
        Output { inner: Some(inner) }
    }

    fn print(&mut self, text: &str) {
        let Some(inner) = self.inner.as_mut() else {
            return;
        };
        if let Err(error) = inner.write_all(text.as_bytes()) {
            warn!(%error, "stdout closed, dropping further output");
            self.inner = None;
        }
    }

    fn flush(&mut self) {
        if let Some(inner) = self.inner.as_mut() {
            if let Err(error) = inner.flush() {
                warn!(%error, "cannot flush stdout");
                self.inner = None;
            }
        }
    }
}
