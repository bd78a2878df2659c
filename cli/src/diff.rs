use std::path::Path;

use similar::{Algorithm, TextDiff};

/// Unified diff from `original` to `formatted`, with `a/` and `b/` headers.
pub fn unified_diff(path: &Path, original: &str, formatted: &str) -> String {
    let name = path.display().to_string();
    TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(original, formatted)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{}", name), &format!("b/{}", name))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_changed_lines_with_headers() {
        let diff = unified_diff(
            Path::new("svc.sdl"),
            "service \"a\" {\n   version=\"1\"\n}\n",
            "service \"a\" {\n  version = \"1\"\n}\n",
        );
        assert!(diff.starts_with("--- a/svc.sdl\n+++ b/svc.sdl\n"), "{}", diff);
        assert!(diff.contains("-   version=\"1\"\n"));
        assert!(diff.contains("+  version = \"1\"\n"));
    }

    #[test]
    fn identical_text_has_no_hunks() {
        let text = "config {}\n";
        assert!(!unified_diff(Path::new("c.sdl"), text, text).contains("@@"));
    }
}
