//! `prepress process` command implementation.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use prepress_config::Config;
use prepress_rewrite::{FileSnippets, Preprocessor};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the process command.
#[derive(Args)]
pub(crate) struct ProcessArgs {
    /// Path to configuration file (default: auto-discover prepress.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    docs_dir: Option<PathBuf>,

    /// Output directory for rewritten pages.
    #[arg(short, long)]
    out_dir: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ProcessArgs {
    /// Execute the process command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a referenced snippet or
    /// example file is missing, or output files cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref())?;
        let docs_dir = self.docs_dir.unwrap_or(config.docs_dir);

        let mut preprocessor = Preprocessor::new(&docs_dir, config.examples_dir)
            .video_domain(config.video.domain)
            .gateway_page(config.gateway.page)
            .snippets(Box::new(FileSnippets));
        if let Some(providers) = config.gateway.providers {
            preprocessor = preprocessor.providers(providers);
        }

        let (pages, assets) = process_tree(&preprocessor, &docs_dir, &self.out_dir)?;

        if pages == 0 {
            output.warning(&format!(
                "No markdown pages found under {}",
                docs_dir.display()
            ));
        }
        output.success(&format!(
            "Processed {pages} pages ({assets} assets copied) into {}",
            self.out_dir.display()
        ));
        Ok(())
    }
}

/// Walk the docs tree, rewriting markdown pages and copying other files.
///
/// Returns the number of pages rewritten and assets copied.
fn process_tree(
    preprocessor: &Preprocessor,
    docs_dir: &Path,
    out_dir: &Path,
) -> Result<(usize, usize), CliError> {
    let mut pages = 0usize;
    let mut assets = 0usize;

    for entry in ignore::WalkBuilder::new(docs_dir).build() {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let relative = path.strip_prefix(docs_dir).unwrap_or(path);
        let dest = out_dir.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }

        if relative.extension().is_some_and(|ext| ext == "md") {
            let page_path = relative.to_string_lossy().replace('\\', "/");
            tracing::info!(page = page_path, "rewriting page");
            let markdown = fs::read_to_string(path)?;
            let rewritten = preprocessor.process(&markdown, &page_path)?;
            fs::write(&dest, rewritten)?;
            pages += 1;
        } else {
            fs::copy(path, &dest)?;
            assets += 1;
        }
    }

    Ok((pages, assets))
}
