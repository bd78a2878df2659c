mod config;
mod diff;
mod discovery;
mod error;
mod fmt;
mod render;
mod validate;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use render::Reporter;

#[derive(Parser)]
#[command(
    name = "sdl",
    version,
    about = "Format, validate, and compile service definition files"
)]
struct Cli {
    /// Disable colored diagnostic output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log pipeline progress to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite .sdl files in canonical form
    Fmt(fmt::FmtArgs),

    /// Check .sdl files against the schema
    Validate(validate::ValidateArgs),

    /// Compile .sdl files (not implemented yet)
    Compile(CompileArgs),
}

#[derive(clap::Args)]
struct CompileArgs {
    /// File or directory to compile
    #[arg(default_value = ".")]
    path: PathBuf,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut reporter = Reporter::new(cli.no_color);
    let result = match &cli.command {
        Command::Fmt(args) => fmt::run(args, &mut reporter),
        Command::Validate(args) => validate::run(args, &mut reporter),
        Command::Compile(args) => {
            tracing::debug!(path = %args.path.display(), "compile requested");
            println!("compile is not implemented yet");
            Ok(0)
        }
    };

    match result {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(1);
        }
    }
}
