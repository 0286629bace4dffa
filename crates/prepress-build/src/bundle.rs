//! Post-build bundle patch.
//!
//! The bundled mermaid styles render state-diagram titles in the same
//! color as the dark-mode background. The patch inserts an extra CSS rule
//! in front of the first `.statediagram` selector so titles stay visible.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::context::BuildContext;

/// Closing brace immediately followed by the statediagram selector.
static STATEDIAGRAM_SELECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\}(\.statediagram)").unwrap());

/// The inserted rule.
const TITLE_FIX: &str = ".statediagramTitleText{fill:#888}";

/// Error while reading or writing the bundle file.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    /// I/O error on the bundle file.
    #[error("I/O error patching bundle {}: {source}", .path.display())]
    Io {
        /// Bundle file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Apply the dark-mode title fix to the recorded bundle.
///
/// Reads the bundle, inserts [`TITLE_FIX`] before the first
/// `.statediagram` selector occurrence, and writes it back. Applied at
/// most once per call; the patch is not idempotent, so the host must run
/// it exactly once per build. A recorded path that no longer exists on
/// disk is tolerated and skipped.
///
/// # Panics
///
/// Panics if the bundle was never discovered during environment setup.
/// That is an ordering defect in the host, not a runtime condition.
pub fn patch_bundle(ctx: &BuildContext) -> Result<(), BundleError> {
    let path = ctx
        .bundle_path()
        .expect("bundle must be discovered during environment setup before post-build");

    if !path.exists() {
        tracing::debug!(bundle = %path.display(), "bundle missing at patch time, skipping");
        return Ok(());
    }

    let io_err = |source| BundleError::Io {
        path: path.to_path_buf(),
        source,
    };

    let content = std::fs::read_to_string(path).map_err(io_err)?;
    let patched = apply_title_fix(&content);
    std::fs::write(path, patched).map_err(io_err)?;

    tracing::info!(bundle = %path.display(), "patched bundle styles");
    Ok(())
}

/// Insert the title fix before the first `.statediagram` selector.
///
/// Content without the selector is returned unchanged.
#[must_use]
pub(crate) fn apply_title_fix(content: &str) -> String {
    STATEDIAGRAM_SELECTOR
        .replace(content, format!("}}{TITLE_FIX}${{1}}"))
        .into_owned()
}

/// Count how many times the title fix is present in bundle text.
///
/// Exposed for hosts that want to verify the single-application
/// assumption after a build.
#[must_use]
pub fn title_fix_applied(content: &str) -> usize {
    content.matches(TITLE_FIX).count()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::context::{BuildContext, SiteFile};

    const BUNDLE: &str = ".foo{color:red}.statediagram{fill:#000}.statediagram-state{x:1}";

    #[test]
    fn test_fix_inserted_before_first_selector() {
        let patched = apply_title_fix(BUNDLE);

        assert_eq!(
            patched,
            ".foo{color:red}.statediagramTitleText{fill:#888}.statediagram{fill:#000}.statediagram-state{x:1}"
        );
        assert_eq!(title_fix_applied(&patched), 1);
    }

    #[test]
    fn test_only_first_occurrence_patched() {
        let content = "a{x:1}.statediagram{a}b{y:2}.statediagram{b}";

        let patched = apply_title_fix(content);

        assert_eq!(title_fix_applied(&patched), 1);
        assert!(patched.ends_with("b{y:2}.statediagram{b}"));
    }

    #[test]
    fn test_no_selector_is_identity() {
        let content = "a{x:1}b{y:2}";
        assert_eq!(apply_title_fix(content), content);
        assert_eq!(title_fix_applied(content), 0);
    }

    #[test]
    fn test_double_application_inserts_twice() {
        // Not idempotent: the inserted rule ends in a closing brace that
        // re-creates the match context.
        let patched = apply_title_fix(&apply_title_fix(BUNDLE));

        assert_eq!(title_fix_applied(&patched), 2);
    }

    #[test]
    fn test_patch_bundle_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let scripts = dir.path().join("assets/javascripts");
        std::fs::create_dir_all(&scripts).unwrap();
        let bundle = scripts.join("bundle.ab12cd34.min.js");
        std::fs::write(&bundle, BUNDLE).unwrap();

        let mut ctx = BuildContext::new();
        ctx.discover_bundle(vec![SiteFile {
            src_uri: "assets/javascripts/bundle.ab12cd34.min.js".to_owned(),
            dest_dir: dir.path().to_path_buf(),
        }]);

        patch_bundle(&ctx).unwrap();

        let content = std::fs::read_to_string(&bundle).unwrap();
        assert_eq!(title_fix_applied(&content), 1);
    }

    #[test]
    fn test_missing_bundle_file_is_skipped() {
        let mut ctx = BuildContext::new();
        ctx.discover_bundle(vec![SiteFile {
            src_uri: "assets/javascripts/bundle.ab12cd34.min.js".to_owned(),
            dest_dir: PathBuf::from("/nonexistent"),
        }]);

        // Tolerated absence: no error.
        patch_bundle(&ctx).unwrap();
    }

    #[test]
    #[should_panic(expected = "environment setup")]
    fn test_undiscovered_bundle_panics() {
        let ctx = BuildContext::new();
        let _ = patch_bundle(&ctx);
    }
}
