//! Freeze command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_site::{Freezer, Site};

use crate::config::load_config;

/// Run the freeze command.
pub async fn run(config_path: &Path, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Freezing site...");

    let file_config = load_config(config_path)?;

    let site = Site::load(file_config.site_config()).context("Failed to load site")?;
    let config = file_config.freeze_config(output, minify);

    let result = Freezer::new(&site, config).freeze()?;

    tracing::info!(
        "Froze {} pages and {} static files in {}ms",
        result.pages,
        result.assets,
        result.duration_ms
    );

    if result.removed > 0 {
        tracing::info!("Removed {} stale files", result.removed);
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
