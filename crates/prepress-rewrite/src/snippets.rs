//! Snippet expansion seam.
//!
//! The pipeline delegates snippet expansion to a [`SnippetEngine`]: the
//! host build tool owns the include syntax, the pipeline only guarantees
//! that includes resolve relative to the page's own directory.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::pipeline::RewriteError;

/// Expands file-inclusion directives in a page's markdown.
pub trait SnippetEngine {
    /// Expand includes in `markdown`, resolving relative paths against
    /// `base_dir` (the page's directory).
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::SnippetNotFound`] when an included file
    /// does not exist.
    fn inject(&self, markdown: &str, base_dir: &Path) -> Result<String, RewriteError>;
}

/// Identity engine for hosts that expand snippets elsewhere.
#[derive(Debug, Default)]
pub struct NoSnippets;

impl SnippetEngine for NoSnippets {
    fn inject(&self, markdown: &str, _base_dir: &Path) -> Result<String, RewriteError> {
        Ok(markdown.to_owned())
    }
}

static SCISSORS_INCLUDE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^--8<--\s+"([^"]+)"$"#).unwrap());

/// Scissors-style file inclusion (`--8<-- "relative/path"`).
///
/// Each include line is replaced by the referenced file's contents with
/// the trailing newline trimmed.
#[derive(Debug, Default)]
pub struct FileSnippets;

impl SnippetEngine for FileSnippets {
    fn inject(&self, markdown: &str, base_dir: &Path) -> Result<String, RewriteError> {
        let mut out = Vec::new();
        for line in markdown.split('\n') {
            match SCISSORS_INCLUDE.captures(line.trim()) {
                Some(caps) => {
                    let path = base_dir.join(&caps[1]);
                    let content = std::fs::read_to_string(&path).map_err(|source| {
                        if source.kind() == std::io::ErrorKind::NotFound {
                            RewriteError::SnippetNotFound { path, source }
                        } else {
                            RewriteError::Io(source)
                        }
                    })?;
                    out.push(content.trim_end().to_owned());
                }
                None => out.push(line.to_owned()),
            }
        }
        Ok(out.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_noop_engine_is_identity() {
        let output = NoSnippets
            .inject("a\n--8<-- \"b.md\"\nc", Path::new("."))
            .unwrap();

        assert_eq!(output, "a\n--8<-- \"b.md\"\nc");
    }

    #[test]
    fn test_include_resolves_against_base_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("shared")).unwrap();
        fs::write(dir.path().join("shared/note.md"), "included text\n").unwrap();

        let output = FileSnippets
            .inject("before\n--8<-- \"shared/note.md\"\nafter", dir.path())
            .unwrap();

        assert_eq!(output, "before\nincluded text\nafter");
    }

    #[test]
    fn test_plain_page_untouched() {
        let dir = TempDir::new().unwrap();
        let markdown = "no includes here\n";

        let output = FileSnippets.inject(markdown, dir.path()).unwrap();

        assert_eq!(output, markdown);
    }

    #[test]
    fn test_missing_include_errors() {
        let dir = TempDir::new().unwrap();

        let err = FileSnippets
            .inject("--8<-- \"missing.md\"", dir.path())
            .unwrap_err();

        assert!(matches!(err, RewriteError::SnippetNotFound { .. }));
    }
}
