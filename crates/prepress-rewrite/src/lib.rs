//! Markdown rewrite pipeline for documentation pages.
//!
//! This crate provides [`Preprocessor`], which applies a fixed sequence of
//! text rewrites to a page's raw markdown before the site renderer converts
//! it to HTML:
//!
//! 1. Snippet injection (delegated to a [`SnippetEngine`])
//! 2. Package-manager command tabs (`pip` / `uv`)
//! 3. Example-file inlining
//! 4. Video embed expansion
//! 5. Gateway code-block toggles
//!
//! Every stage is a total function over markdown: input that carries none
//! of the stage's directives passes through unchanged. The two stages that
//! read referenced files (snippets, examples) fail the page — and thereby
//! the build — when a referenced file is missing.
//!
//! # Example
//!
//! ```
//! use prepress_rewrite::Preprocessor;
//!
//! let preprocessor = Preprocessor::new("docs", "examples");
//! let output = preprocessor.process("# Title\n\nplain page", "guide/index.md")?;
//! assert_eq!(output, "# Title\n\nplain page");
//! # Ok::<(), prepress_rewrite::RewriteError>(())
//! ```

mod commands;
mod examples;
mod fence;
mod gateway;
mod pipeline;
mod snippets;
mod util;
mod video;

pub use gateway::GATEWAY_PROVIDERS;
pub use pipeline::{Preprocessor, RewriteError};
pub use snippets::{FileSnippets, NoSnippets, SnippetEngine};
pub use util::relative_path;
