//! Shared path utilities.

/// Compute a relative URL from one page to another (RFC 3986).
///
/// Both arguments are slash-separated paths relative to the docs root.
/// The last segment of `from` is the current document, so the base
/// directory is everything before it; a trailing slash means the whole
/// path is the directory.
///
/// # Examples
///
/// ```
/// use prepress_rewrite::relative_path;
///
/// assert_eq!(relative_path("index.md", "gateway"), "gateway");
/// assert_eq!(relative_path("agents/tools.md", "gateway"), "../gateway");
/// ```
pub fn relative_path(from: &str, to: &str) -> String {
    let mut from_dir: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    if !from.ends_with('/') {
        from_dir.pop();
    }
    let to_segs: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_dir
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = "../".repeat(from_dir.len() - common);
    result.push_str(&to_segs[common..].join("/"));

    if result.is_empty() {
        "./".to_owned()
    } else {
        result
    }
}
