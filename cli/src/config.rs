use std::fs;
use std::path::{Path, PathBuf};

use sdl::ActionStyle;
use serde::Deserialize;
use tracing::debug;

use crate::error::CliError;

/// Name of the config file looked up beside the searched path.
pub const CONFIG_FILE: &str = "sdl.toml";

/// Contents of `sdl.toml`. Every value is optional; command-line flags win.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub fmt: FmtSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FmtSection {
    pub actions: Option<ActionStyle>,
    pub line_length: Option<usize>,
    pub jobs: Option<usize>,
}

impl FileConfig {
    pub fn parse(path: &Path, text: &str) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given (it must exist), else `sdl.toml` beside `search`
    /// if there is one, else defaults.
    pub fn load(explicit: Option<&Path>, search: &Path) -> Result<Self, CliError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_location(search) {
                Some(path) if path.is_file() => path,
                _ => return Ok(FileConfig::default()),
            },
        };

        let text = fs::read_to_string(&path).map_err(|source| CliError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let config = Self::parse(&path, &text)?;
        debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }
}

fn default_location(search: &Path) -> Option<PathBuf> {
    if search.is_dir() {
        Some(search.join(CONFIG_FILE))
    } else {
        search.parent().map(|dir| dir.join(CONFIG_FILE))
    }
}
