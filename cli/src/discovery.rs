use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::CliError;

pub const EXTENSION: &str = "sdl";

/// Files to process for `root`: the file itself, or every `.sdl` file below a
/// directory (hidden directories skipped), sorted.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, CliError> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    if !root.is_dir() {
        return Err(CliError::PathNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let skipped = collect(root, &mut files);
    if skipped > 0 {
        warn!(root = %root.display(), skipped, "some directories could not be read");
    }
    files.sort();
    if files.is_empty() {
        return Err(CliError::NoFiles(root.to_path_buf()));
    }
    Ok(files)
}

/// Returns how many directories or entries could not be read.
fn collect(dir: &Path, out: &mut Vec<PathBuf>) -> usize {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(path = %dir.display(), %error, "skipping unreadable directory");
            return 1;
        }
    };
    let mut skipped = 0;
    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(error) => {
                warn!(path = %dir.display(), %error, "skipping unreadable directory entry");
                skipped += 1;
                continue;
            }
        };
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if path.is_dir() {
            if !hidden {
                skipped += collect(&path, out);
            }
        } else if path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
            out.push(path);
        }
    }
    skipped
}
