//! Video embed expansion.
//!
//! Replaces `{{ video("<id>"[, <start>[, <padding>]]) }}` directives with a
//! responsive iframe embed pointing at the streaming domain. The poster
//! image URL is derived from the video id and start time and
//! percent-encoded into the iframe source query string.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::{Captures, Regex};

/// Query-value encoding: keep alphanumerics and the RFC 3986 unreserved
/// marks, encode everything else.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Default padding-top percentage when the directive omits it.
const DEFAULT_PADDING_TOP: &str = "67";

static VIDEO_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{ *video\((?:"([^"]+)"|'([^']+)')(?:, (\d+))?(?:, (\d+))?\) *\}\}"#).unwrap()
});

/// Expand video directives into iframe embeds.
pub(crate) fn rewrite(markdown: &str, domain: &str) -> String {
    VIDEO_DIRECTIVE
        .replace_all(markdown, |caps: &Captures<'_>| {
            let video_id = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map_or("", |m| m.as_str());
            let time = caps
                .get(3)
                .map_or(String::new(), |m| format!("{}s", m.as_str()));
            let padding_top = caps.get(4).map_or(DEFAULT_PADDING_TOP, |m| m.as_str());
            embed(domain, video_id, &time, padding_top)
        })
        .into_owned()
}

/// Build the embed fragment for one video.
fn embed(domain: &str, video_id: &str, time: &str, padding_top: &str) -> String {
    let poster = format!("{domain}/{video_id}/thumbnails/thumbnail.jpg?time={time}&height=600");
    let poster = utf8_percent_encode(&poster, QUERY_VALUE).to_string();

    format!(
        r#"
<div style="position: relative; padding-top: {padding_top}%;">
  <iframe
    src="{domain}/{video_id}/iframe?poster={poster}"
    loading="lazy"
    style="border: none; position: absolute; top: 0; left: 0; height: 100%; width: 100%;"
    allow="accelerometer; gyroscope; autoplay; encrypted-media; picture-in-picture;"
    allowfullscreen="true"
  ></iframe>
</div>
"#
    )
}
