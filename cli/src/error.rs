use std::io;
use std::path::PathBuf;

use sdl::ConfigError;
use thiserror::Error;

/// Failures that stop a command before or outside per-file processing.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("no .sdl files found under {}", .0.display())]
    NoFiles(PathBuf),

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
