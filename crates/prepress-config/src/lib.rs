//! Configuration management for prepress.
//!
//! Parses `prepress.toml` configuration files with serde. All sections
//! and fields are optional; defaults match the conventional docs layout
//! (`docs/`, `examples/`, `site/`).
//!
//! ```toml
//! docs_dir = "docs"
//! examples_dir = "examples"
//! site_dir = "site"
//!
//! [video]
//! domain = "https://videodelivery.net"
//!
//! [gateway]
//! page = "gateway"
//! providers = ["anthropic", "openai"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "prepress.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the markdown source tree.
    pub docs_dir: PathBuf,
    /// Directory that example markers resolve against.
    pub examples_dir: PathBuf,
    /// Built site output directory (bundle discovery and patching).
    pub site_dir: PathBuf,
    /// Video embed configuration.
    pub video: VideoConfig,
    /// Gateway toggle configuration.
    pub gateway: GatewayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            examples_dir: PathBuf::from("examples"),
            site_dir: PathBuf::from("site"),
            video: VideoConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Video embed configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    /// Streaming domain serving iframes and poster thumbnails.
    pub domain: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            domain: "https://videodelivery.net".to_owned(),
        }
    }
}

/// Gateway toggle configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Gateway documentation page, relative to the docs root.
    pub page: String,
    /// Provider allow-list. `None` keeps the built-in list.
    pub providers: Option<Vec<String>>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            page: "gateway".to_owned(),
            providers: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load configuration, optionally from an explicit file.
    ///
    /// Without an explicit path, searches for `prepress.toml` in the
    /// current directory and its parents and falls back to defaults when
    /// none is found.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist or
    /// parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        match Self::discover_config() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    ///
    /// Relative directories are resolved against the file's parent so
    /// the config works regardless of the invocation directory.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        let base = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(base);
        Ok(config)
    }

    /// Search for the config file in the current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Resolve relative directories against a base directory.
    fn resolve_paths(&mut self, base: &Path) {
        for dir in [&mut self.docs_dir, &mut self.examples_dir, &mut self.site_dir] {
            if dir.is_relative() {
                *dir = base.join(&*dir);
            }
        }
    }
}
