//! Example-file inlining.
//!
//! Lines of the form `#! examples/<path>` are replaced by the referenced
//! file's contents. A leading triple-quoted docstring is stripped from the
//! inlined file since it duplicates the surrounding page prose.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::pipeline::RewriteError;

static EXAMPLE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#! *examples/(.+)$").unwrap());

static LEADING_DOCSTRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)^""".*?""""#).unwrap());

/// Replace `#! examples/...` marker lines with the referenced file contents.
///
/// # Errors
///
/// Returns [`RewriteError::ExampleNotFound`] when a referenced file does
/// not exist; the error carries the resolved path so the build tool can
/// report which page reference is broken.
pub(crate) fn rewrite(markdown: &str, examples_dir: &Path) -> Result<String, RewriteError> {
    let mut out = Vec::new();
    for line in markdown.split('\n') {
        match EXAMPLE_MARKER.captures(line) {
            Some(caps) => out.push(inline_example(examples_dir, &caps[1])?),
            None => out.push(line.to_owned()),
        }
    }
    Ok(out.join("\n"))
}

/// Read one example file, stripping the leading docstring if present.
fn inline_example(examples_dir: &Path, relative: &str) -> Result<String, RewriteError> {
    let path = examples_dir.join(relative);
    let content = std::fs::read_to_string(&path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            RewriteError::ExampleNotFound { path, source }
        } else {
            RewriteError::Io(source)
        }
    })?;

    let content = content.trim();
    let content = LEADING_DOCSTRING.replace(content, "");
    Ok(content.trim().to_owned())
}
