//! Package-manager command tabs.
//!
//! Rewrites fenced `bash` blocks whose command line carries a runner
//! marker (`python/uv-run`, `pip/uv-add`, or `py-cli`) into two mutually
//! exclusive tabs, one invoking via `pip`/`python` and one via `uv`. The
//! marker token is substituted out of the visible command and replaced by
//! the invocation prefix appropriate to each tab.
//!
//! Only single-line commands are rewritten; a `bash` block with several
//! lines passes through unchanged.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static COMMAND_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```bash\n(.*?)(python/uv[\- ]run|pip/uv[\- ]add|py-cli)(.+?)\n```").unwrap()
});

/// Rewrite marked `bash` blocks into `pip`/`uv` tabs.
///
/// Markdown without a marked block is returned unchanged.
pub(crate) fn rewrite(markdown: &str) -> String {
    COMMAND_BLOCK
        .replace_all(markdown, |caps: &Captures<'_>| {
            tabs(&caps[1], &caps[2], &caps[3])
        })
        .into_owned()
}

/// Build the two-tab replacement for one marked command.
///
/// The marker decides the invocation verbs: package-install markers use
/// `pip install` / `uv add`, the CLI marker drops the pip prefix entirely,
/// and the generic run marker uses `python` / `uv run`.
fn tabs(prefix: &str, marker: &str, suffix: &str) -> String {
    let (pip_base, uv_base) = if marker.contains("pip") {
        ("pip install", "uv add")
    } else if marker == "py-cli" {
        ("", "uv run")
    } else {
        ("python", "uv run")
    };

    format!(
        "=== \"pip\"\n\n    \
         ```bash\n    \
         {prefix}{pip_base}{suffix}\n    \
         ```\n\n\
         === \"uv\"\n\n    \
         ```bash\n    \
         {prefix}{uv_base}{suffix}\n    \
         ```"
    )
}
