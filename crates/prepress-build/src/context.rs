//! Build context threaded from environment setup to post-build.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;

/// Source URI of the content-hashed front-end bundle.
static BUNDLE_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^assets/javascripts/bundle\.[a-z0-9]+\.min\.js$").unwrap());

/// One file of the built site, as reported by the host build tool.
#[derive(Clone, Debug)]
pub struct SiteFile {
    /// Path relative to the site root (forward slashes).
    pub src_uri: String,
    /// Destination directory the file is written under.
    pub dest_dir: PathBuf,
}

/// State carried from the environment-setup phase to the post-build phase.
///
/// Created once per build. The bundle path is written at most once, by
/// whichever discovery method runs during environment setup.
#[derive(Debug)]
pub struct BuildContext {
    bundle_path: Option<PathBuf>,
    build_timestamp: String,
}

impl BuildContext {
    /// Create a context stamped with the current unix time.
    #[must_use]
    pub fn new() -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        Self {
            bundle_path: None,
            build_timestamp: timestamp.to_string(),
        }
    }

    /// Record the bundle path from the host's file set.
    ///
    /// Scans for the file whose source URI matches the hashed bundle
    /// pattern and records its destination path. Returns whether a bundle
    /// was found.
    pub fn discover_bundle<I>(&mut self, files: I) -> bool
    where
        I: IntoIterator<Item = SiteFile>,
    {
        for file in files {
            if BUNDLE_SRC.is_match(&file.src_uri) {
                let path = file.dest_dir.join(&file.src_uri);
                tracing::debug!(bundle = %path.display(), "discovered bundle");
                self.bundle_path = Some(path);
                return true;
            }
        }
        false
    }

    /// Record the bundle path by scanning a built site directory.
    ///
    /// Used by hosts that expose only the output directory. The glob hit
    /// is validated against the hashed-bundle pattern so that unrelated
    /// files under `assets/javascripts/` are not picked up.
    pub fn discover_bundle_in_dir(&mut self, site_dir: &Path) -> bool {
        let pattern = site_dir
            .join("assets/javascripts/bundle.*.min.js")
            .to_string_lossy()
            .into_owned();
        let Ok(paths) = glob::glob(&pattern) else {
            return false;
        };
        for path in paths.flatten() {
            let Ok(relative) = path.strip_prefix(site_dir) else {
                continue;
            };
            let uri = relative.to_string_lossy().replace('\\', "/");
            if BUNDLE_SRC.is_match(&uri) {
                tracing::debug!(bundle = %path.display(), "discovered bundle");
                self.bundle_path = Some(path);
                return true;
            }
        }
        false
    }

    /// The recorded bundle path, if discovery found one.
    #[must_use]
    pub fn bundle_path(&self) -> Option<&Path> {
        self.bundle_path.as_deref()
    }

    /// Unix-seconds timestamp registered for the renderer's templates.
    #[must_use]
    pub fn build_timestamp(&self) -> &str {
        &self.build_timestamp
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}
