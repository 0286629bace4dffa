//! The orchestrating rewrite pipeline.
//!
//! [`Preprocessor`] chains the individual rewrite stages in fixed order:
//! snippets, command tabs, example inlining, video embeds, gateway toggles.
//! Later stages see the output of earlier ones, so directives inside
//! inlined example files are still expanded.

use std::path::{Path, PathBuf};

use crate::snippets::{NoSnippets, SnippetEngine};
use crate::{commands, examples, gateway, video};

/// Default streaming domain for video embeds.
const DEFAULT_VIDEO_DOMAIN: &str = "https://videodelivery.net";

/// Default gateway documentation page, relative to the docs root.
const DEFAULT_GATEWAY_PAGE: &str = "gateway";

/// Error returned when a rewrite stage fails.
///
/// Only stages that read referenced files can fail. A failed page aborts
/// the surrounding build; there is no partial-success mode.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// A snippet include referenced a file that does not exist.
    #[error("Snippet file not found: {}", .path.display())]
    SnippetNotFound {
        /// Resolved path of the missing snippet.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// An example marker referenced a file that does not exist.
    #[error("Example file not found: {}", .path.display())]
    ExampleNotFound {
        /// Resolved path of the missing example.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Other I/O error while reading a referenced file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Markdown preprocessor applied once per page before HTML rendering.
///
/// Holds the fixed rewrite configuration (directories, gateway target,
/// provider allow-list, video domain) and the snippet engine. Stateless
/// across pages: each [`process`](Self::process) call is independent.
///
/// # Example
///
/// ```
/// use prepress_rewrite::{NoSnippets, Preprocessor};
///
/// let preprocessor = Preprocessor::new("docs", "examples")
///     .gateway_page("gateway")
///     .snippets(Box::new(NoSnippets));
/// ```
pub struct Preprocessor {
    docs_dir: PathBuf,
    examples_dir: PathBuf,
    video_domain: String,
    gateway_page: String,
    providers: Vec<String>,
    snippets: Box<dyn SnippetEngine>,
}

impl Preprocessor {
    /// Create a preprocessor for a docs tree.
    ///
    /// # Arguments
    ///
    /// * `docs_dir` - Root of the markdown source tree. Snippet includes
    ///   resolve relative to each page's directory under this root.
    /// * `examples_dir` - Directory that `#! examples/...` markers resolve
    ///   against.
    #[must_use]
    pub fn new(docs_dir: impl Into<PathBuf>, examples_dir: impl Into<PathBuf>) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            examples_dir: examples_dir.into(),
            video_domain: DEFAULT_VIDEO_DOMAIN.to_owned(),
            gateway_page: DEFAULT_GATEWAY_PAGE.to_owned(),
            providers: gateway::GATEWAY_PROVIDERS
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            snippets: Box::new(NoSnippets),
        }
    }

    /// Set the streaming domain used by video embeds.
    #[must_use]
    pub fn video_domain(mut self, domain: impl Into<String>) -> Self {
        self.video_domain = domain.into();
        self
    }

    /// Set the gateway documentation page, relative to the docs root.
    ///
    /// Gateway toggle tabs link to this page with a relative path computed
    /// from the page being processed.
    #[must_use]
    pub fn gateway_page(mut self, page: impl Into<String>) -> Self {
        self.gateway_page = page.into();
        self
    }

    /// Replace the provider allow-list for gateway toggles.
    ///
    /// Defaults to [`GATEWAY_PROVIDERS`](crate::GATEWAY_PROVIDERS).
    #[must_use]
    pub fn providers(mut self, providers: Vec<String>) -> Self {
        self.providers = providers;
        self
    }

    /// Set the snippet engine. Defaults to [`NoSnippets`].
    #[must_use]
    pub fn snippets(mut self, snippets: Box<dyn SnippetEngine>) -> Self {
        self.snippets = snippets;
        self
    }

    /// Apply all rewrite stages to one page's markdown.
    ///
    /// `page_path` is the page's path relative to the docs root (for
    /// example `"agents/index.md"`); it provides the base directory for
    /// snippet resolution and the starting point for the gateway link.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::SnippetNotFound`] or
    /// [`RewriteError::ExampleNotFound`] when a referenced file is missing.
    pub fn process(&self, markdown: &str, page_path: &str) -> Result<String, RewriteError> {
        tracing::debug!(page = page_path, "preprocessing page");

        let base_dir = match Path::new(page_path).parent() {
            Some(parent) if parent != Path::new("") => self.docs_dir.join(parent),
            _ => self.docs_dir.clone(),
        };

        let markdown = self.snippets.inject(markdown, &base_dir)?;
        let markdown = commands::rewrite(&markdown);
        let markdown = examples::rewrite(&markdown, &self.examples_dir)?;
        let markdown = video::rewrite(&markdown, &self.video_domain);
        let markdown = gateway::rewrite(&markdown, page_path, &self.gateway_page, &self.providers);
        Ok(markdown)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::snippets::FileSnippets;

    /// Tempdir fixture with `docs/` and `examples/` subdirectories.
    struct DocsTree {
        root: TempDir,
    }

    impl DocsTree {
        fn new() -> Self {
            let root = TempDir::new().unwrap();
            fs::create_dir(root.path().join("docs")).unwrap();
            fs::create_dir(root.path().join("examples")).unwrap();
            Self { root }
        }

        fn preprocessor(&self) -> Preprocessor {
            Preprocessor::new(
                self.root.path().join("docs"),
                self.root.path().join("examples"),
            )
        }

        fn write_example(&self, name: &str, content: &str) {
            fs::write(self.root.path().join("examples").join(name), content).unwrap();
        }
    }

    #[test]
    fn test_plain_page_is_identity() {
        let preprocessor = Preprocessor::new("docs", "examples");
        let markdown = "# Title\n\nSome prose with `inline code`.\n";

        let output = preprocessor.process(markdown, "guide/index.md").unwrap();

        assert_eq!(output, markdown);
    }

    #[test]
    fn test_stages_chain_on_one_page() {
        let preprocessor = Preprocessor::new("docs", "examples");
        let markdown = concat!(
            "```bash\npip/uv-add prepress\n```\n",
            "\n",
            "{{ video(\"abc\") }}\n",
        );

        let output = preprocessor.process(markdown, "install.md").unwrap();

        assert!(output.contains("pip install prepress"));
        assert!(output.contains("uv add prepress"));
        assert!(output.contains("<iframe"));
    }

    #[test]
    fn test_example_marker_inlines_file_without_docstring_header() {
        let tree = DocsTree::new();
        tree.write_example(
            "weather.py",
            "\"\"\"Weather agent example.\n\nShown on the docs page.\n\"\"\"\n\nimport sys\n\nrun(sys.argv)\n",
        );

        let markdown = "# Weather\n#! examples/weather.py\nDone.";
        let output = tree.preprocessor().process(markdown, "weather.md").unwrap();

        assert_eq!(output, "# Weather\nimport sys\n\nrun(sys.argv)\nDone.");
    }

    #[test]
    fn test_missing_example_fails_the_page() {
        let tree = DocsTree::new();

        let err = tree
            .preprocessor()
            .process("#! examples/gone.py", "index.md")
            .unwrap_err();

        match err {
            RewriteError::ExampleNotFound { path, .. } => assert!(path.ends_with("gone.py")),
            other => panic!("expected ExampleNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_snippets_resolve_against_page_directory() {
        let tree = DocsTree::new();
        fs::create_dir_all(tree.root.path().join("docs/agents")).unwrap();
        fs::write(
            tree.root.path().join("docs/agents/warning.md"),
            "!!! warning\n",
        )
        .unwrap();

        let preprocessor = tree.preprocessor().snippets(Box::new(FileSnippets));
        let output = preprocessor
            .process("--8<-- \"warning.md\"\n", "agents/index.md")
            .unwrap();

        assert_eq!(output, "!!! warning\n");
    }

    #[test]
    fn test_full_page_applies_all_stages() {
        let tree = DocsTree::new();
        tree.write_example("agent.py", "agent = Agent('anthropic:claude-x')\n");

        let markdown = "\
# Install

```bash
pip/uv-add acme-agents
```

#! examples/agent.py

{{ video(\"intro\", 5) }}

```python
agent = Agent('anthropic:claude-x')
```
";

        let output = tree
            .preprocessor()
            .process(markdown, "getting-started/index.md")
            .unwrap();

        // Command tabs.
        assert!(output.contains("    pip install acme-agents"));
        assert!(output.contains("    uv add acme-agents"));
        // Inlined example code sits outside a python fence, so the gateway
        // stage leaves it alone.
        assert!(output.contains("\nagent = Agent('anthropic:claude-x')\n"));
        // Video embed.
        assert!(output.contains("/intro/iframe?poster="));
        assert!(output.contains("time%3D5s"));
        // Gateway toggle with a link one level up.
        assert!(output.contains("=== \"With Gateway\""));
        assert!(output.contains("Agent('gateway/anthropic:claude-x')"));
        assert!(output.contains("<a href='../gateway'"));
    }
}
