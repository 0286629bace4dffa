//! CLI error types.

use prepress_build::BundleError;
use prepress_config::ConfigError;
use prepress_rewrite::RewriteError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Rewrite(#[from] RewriteError),

    #[error("{0}")]
    Bundle(#[from] BundleError),

    #[error("{0}")]
    Walk(#[from] ignore::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Validation(String),
}
