//! `prepress patch` command implementation.

use std::path::PathBuf;

use clap::Args;
use prepress_build::{BuildContext, patch_bundle};
use prepress_config::Config;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the patch command.
#[derive(Args)]
pub(crate) struct PatchArgs {
    /// Path to configuration file (default: auto-discover prepress.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built site directory (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl PatchArgs {
    /// Execute the patch command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, no hashed bundle exists
    /// under the site directory, or the bundle cannot be rewritten.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref())?;
        let site_dir = self.site_dir.unwrap_or(config.site_dir);

        let mut ctx = BuildContext::new();
        if !ctx.discover_bundle_in_dir(&site_dir) {
            return Err(CliError::Validation(format!(
                "no hashed bundle found under {}",
                site_dir.display()
            )));
        }
        if let Some(bundle) = ctx.bundle_path() {
            output.info(&format!("Patching {}", bundle.display()));
        }

        patch_bundle(&ctx)?;
        output.success("Bundle patched");
        Ok(())
    }
}
