//! Gateway code-block toggles.
//!
//! Scans fenced `py`/`python` blocks for `Agent(...)` constructions whose
//! first quoted argument is a `<provider>:<model>` identifier. Blocks with
//! an allow-listed provider are duplicated into two tabs: one rewriting
//! the model to the `gateway/` namespace, one with the untouched code. A
//! cross-link to the gateway documentation page is injected into the
//! gateway tab's title attribute, with the href computed relative to the
//! page being processed.
//!
//! Detection is textual: `Agent(` occurring inside a string literal or
//! comment is misclassified. The scan is fence-aware, so fence markers
//! inside other code blocks are ignored.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::fence::{self, FenceTracker};
use crate::util::relative_path;

/// Providers whose models participate in the gateway toggle.
pub const GATEWAY_PROVIDERS: [&str; 7] = [
    "anthropic",
    "openai",
    "openai-responses",
    "openai-chat",
    "bedrock",
    "google-vertex",
    "groq",
];

/// `Agent(` followed by its first quoted string argument.
static AGENT_MODEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Agent\([^"']*(?:"([^"']+)"|'([^']+)')"#).unwrap());

/// First line of a numbered-annotation block (`1. note text`).
static ANNOTATION_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\..").unwrap());

/// Rewrite gateway-eligible python blocks into two-tab toggles.
///
/// `page_path` is the current page relative to the docs root; it anchors
/// the relative link to `gateway_page`.
pub(crate) fn rewrite(
    markdown: &str,
    page_path: &str,
    gateway_page: &str,
    providers: &[String],
) -> String {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut tracker = FenceTracker::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if !tracker.in_fence()
            && let Some(attrs) = python_fence_attrs(line)
            && let Some(close) = find_close(&lines, i + 1)
        {
            let code = lines[i + 1..close].join("\n");
            if should_toggle(&code, providers) {
                let annotations = annotations_after(&lines, close);
                out.push(toggle_tabs(
                    &attrs,
                    &code,
                    annotations,
                    page_path,
                    gateway_page,
                ));
                // Skip the separator blank and annotation lines; the
                // terminating blank stays in the stream.
                i = if annotations.is_empty() {
                    close + 1
                } else {
                    close + 2 + annotations.len()
                };
            } else {
                out.push(plain_block(&attrs, &code));
                i = close + 1;
            }
            continue;
        }

        tracker.update(line);
        out.push(line.to_owned());
        i += 1;
    }

    out.join("\n")
}

/// Parse a python fence-opening line, returning its attribute annotation
/// (without braces). Returns `None` for any other line.
fn python_fence_attrs(line: &str) -> Option<String> {
    let rest = line.strip_prefix("```py")?;
    let rest = rest.strip_prefix("thon").unwrap_or(rest);
    let rest = rest.trim_end();
    if rest.is_empty() {
        return Some(String::new());
    }
    let rest = rest.trim_start_matches(' ');
    let rest = rest.strip_prefix('{').unwrap_or(rest);
    let rest = rest.strip_suffix('}').unwrap_or(rest);
    Some(rest.to_owned())
}

/// Find the closing backtick fence at or after `start`.
fn find_close(lines: &[&str], start: usize) -> Option<usize> {
    (start..lines.len()).find(|&j| fence::is_closing_fence(lines[j].trim_start(), '`', 3))
}

/// Numbered-annotation lines following the closing fence, if the full
/// shape (blank separator, numbered first line, blank terminator before
/// further content) is present.
fn annotations_after<'a>(lines: &'a [&'a str], close: usize) -> &'a [&'a str] {
    let first = close + 2;
    if first >= lines.len()
        || !lines[close + 1].is_empty()
        || !ANNOTATION_LINE.is_match(lines[first])
    {
        return &[];
    }
    let mut end = first;
    while end < lines.len() && !lines[end].is_empty() {
        end += 1;
    }
    // A trailing empty element only reflects the file's final newline.
    if end >= lines.len() - 1 {
        return &[];
    }
    &lines[first..end]
}

/// Whether a block's first `Agent(` model belongs to an allow-listed provider.
fn should_toggle(code: &str, providers: &[String]) -> bool {
    if !code.contains("Agent(") {
        return false;
    }
    first_agent_model(code).is_some_and(|model| {
        providers
            .iter()
            .any(|provider| model.starts_with(&format!("{provider}:")))
    })
}

/// The first quoted string argument of the first `Agent(` call.
fn first_agent_model(code: &str) -> Option<&str> {
    let caps = AGENT_MODEL.captures(code)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Rewrite every `Agent(` call's model string to the `gateway/` namespace.
fn gateway_code(code: &str) -> String {
    AGENT_MODEL
        .replace_all(code, |caps: &Captures<'_>| {
            let (quote, model) = match (caps.get(1), caps.get(2)) {
                (Some(m), _) => ('"', m.as_str()),
                (_, Some(m)) => ('\'', m.as_str()),
                _ => return caps[0].to_owned(),
            };
            caps[0].replacen(
                &format!("{quote}{model}{quote}"),
                &format!("{quote}gateway/{model}{quote}"),
                1,
            )
        })
        .into_owned()
}

/// Re-emit a block that does not participate in the toggle.
fn plain_block(attrs: &str, code: &str) -> String {
    format!("```python{}\n{code}\n```", attrs_str(attrs))
}

/// ` {attrs}` when attrs are present, empty otherwise.
fn attrs_str(attrs: &str) -> String {
    if attrs.is_empty() {
        String::new()
    } else {
        format!(" {{{attrs}}}")
    }
}

/// Indent every line (including empty ones) by four spaces.
fn indent4(text: &str) -> String {
    text.split('\n')
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the two-tab replacement for one gateway-eligible block.
fn toggle_tabs(
    attrs: &str,
    code: &str,
    annotations: &[&str],
    page_path: &str,
    gateway_page: &str,
) -> String {
    let href = relative_path(page_path, gateway_page);
    let link = format!("<a href='{href}' style='float: right;'>Learn about Gateway</a>");

    let gateway_attrs = if attrs.contains("title=\"") {
        attrs.replacen("title=\"", &format!("title=\"{link} "), 1)
    } else {
        format!("{attrs} title=\"{link}\"")
    };
    let gateway_attrs_str = format!(" {{{gateway_attrs}}}");

    let indented_code = indent4(code);
    let indented_gateway_code = indent4(&gateway_code(code));

    // Annotation definitions must live inside each tab to stay attached
    // to its code block.
    let (annotations_mid, annotations_end) = if annotations.is_empty() {
        (String::new(), String::new())
    } else {
        let indented = indent4(&annotations.join("\n"));
        (format!("\n\n{indented}\n\n"), format!("\n\n{indented}"))
    };

    format!(
        "=== \"With Gateway\"\n\n    \
         ```python{gateway_attrs_str}\n{indented_gateway_code}\n    \
         ```{annotations_mid}\n\n\
         === \"Directly to Provider API\"\n\n    \
         ```python{}\n{indented_code}\n    \
         ```{annotations_end}",
        attrs_str(attrs)
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn providers() -> Vec<String> {
        GATEWAY_PROVIDERS.iter().map(|p| (*p).to_owned()).collect()
    }

    fn run(markdown: &str, page_path: &str) -> String {
        rewrite(markdown, page_path, "gateway", &providers())
    }

    #[test]
    fn test_page_without_code_is_identity() {
        let markdown = "# Title\n\nprose only\n";
        assert_eq!(run(markdown, "index.md"), markdown);
    }

    #[test]
    fn test_block_without_agent_unmodified() {
        let markdown = "```python {test=\"skip\"}\nprint('hi')\n```\n";
        assert_eq!(run(markdown, "index.md"), markdown);
    }

    #[test]
    fn test_agent_without_string_literal_unmodified() {
        let markdown = "```python\nagent = Agent(model)\n```\n";
        assert_eq!(run(markdown, "index.md"), markdown);
    }

    #[test]
    fn test_unknown_provider_unmodified() {
        let markdown = "```python\nagent = Agent('customprovider:x')\n```\n";
        assert_eq!(run(markdown, "index.md"), markdown);
    }

    #[test]
    fn test_short_fence_info_normalized_to_python() {
        let output = run("```py\nx = 1\n```", "index.md");
        assert_eq!(output, "```python\nx = 1\n```");
    }

    #[test]
    fn test_allow_listed_provider_produces_two_tabs() {
        let markdown = "```python\nagent = Agent('anthropic:claude-x')\n```";

        let output = run(markdown, "index.md");

        assert_eq!(
            output,
            "=== \"With Gateway\"\n\
             \n\
             \x20   ```python { title=\"<a href='gateway' style='float: right;'>Learn about Gateway</a>\"}\n\
             \x20   agent = Agent('gateway/anthropic:claude-x')\n\
             \x20   ```\n\
             \n\
             === \"Directly to Provider API\"\n\
             \n\
             \x20   ```python\n\
             \x20   agent = Agent('anthropic:claude-x')\n\
             \x20   ```"
        );
    }

    #[test]
    fn test_double_quoted_model() {
        let output = run("```python\nagent = Agent(\"openai:gpt-5\")\n```", "index.md");

        assert!(output.contains("Agent(\"gateway/openai:gpt-5\")"));
        assert!(output.contains("Agent(\"openai:gpt-5\")"));
    }

    #[test]
    fn test_model_as_second_argument() {
        let output = run(
            "```python\nagent = Agent(deps_type=int, model='groq:llama')\n```",
            "index.md",
        );

        assert!(output.contains("model='gateway/groq:llama'"));
    }

    #[test]
    fn test_every_agent_call_rewritten_in_gateway_tab() {
        let markdown =
            "```python\na = Agent('anthropic:claude-x')\nb = Agent('openai:gpt-5')\n```";

        let output = run(markdown, "index.md");

        assert!(output.contains("Agent('gateway/anthropic:claude-x')"));
        assert!(output.contains("Agent('gateway/openai:gpt-5')"));
    }

    #[test]
    fn test_relative_link_walks_up_from_nested_page() {
        let output = run(
            "```python\nagent = Agent('anthropic:claude-x')\n```",
            "agents/advanced/tools.md",
        );

        assert!(output.contains("<a href='../../gateway'"));
    }

    #[test]
    fn test_existing_title_gains_link() {
        let output = run(
            "```python {title=\"demo.py\"}\nagent = Agent('anthropic:claude-x')\n```",
            "index.md",
        );

        assert!(output.contains("{title=\"<a href='gateway' style='float: right;'>Learn about Gateway</a> demo.py\"}"));
        // The provider tab keeps the original attrs.
        assert!(output.contains("```python {title=\"demo.py\"}"));
    }

    #[test]
    fn test_annotations_carried_into_both_tabs() {
        let markdown = "```python\nagent = Agent('anthropic:claude-x')  # (1)!\n```\n\n1. The model string.\n\nafter";

        let output = run(markdown, "index.md");

        assert_eq!(output.matches("    1. The model string.").count(), 2);
        assert!(output.ends_with("\n\nafter"));
    }

    #[test]
    fn test_annotations_preserved_on_plain_block() {
        let markdown = "```python\nprint('hi')\n```\n\n1. A note.\n\nafter";

        let output = run(markdown, "index.md");

        assert_eq!(output, markdown);
    }

    #[test]
    fn test_fence_inside_other_block_ignored() {
        let markdown = "````markdown\n```python\nagent = Agent('anthropic:claude-x')\n```\n````\n";

        let output = run(markdown, "index.md");

        assert_eq!(output, markdown);
    }

    #[test]
    fn test_unclosed_fence_passes_through() {
        let markdown = "```python\nagent = Agent('anthropic:claude-x')\n";

        let output = run(markdown, "index.md");

        assert_eq!(output, markdown);
    }

    #[test]
    fn test_empty_provider_list_disables_toggle() {
        let markdown = "```python\nagent = Agent('anthropic:claude-x')\n```\n";

        let output = rewrite(markdown, "index.md", "gateway", &[]);

        assert_eq!(output, markdown);
    }
}
