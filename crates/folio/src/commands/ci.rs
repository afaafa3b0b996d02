//! CI check commands.

use std::path::Path;

use anyhow::{Context, Result};
use folio_ci::AspectRatio;

/// Fail unless every image in `directory` has `aspect_ratio`.
pub fn check_aspect_ratio(directory: &Path, aspect_ratio: &str) -> Result<()> {
    let target: AspectRatio = aspect_ratio.parse()?;

    let report = folio_ci::check_aspect_ratio(directory, &target)
        .with_context(|| format!("Failed to check images in {}", directory.display()))?;

    if !report.all_match() {
        anyhow::bail!(
            "{} of {} images do not have the target aspect ratio",
            report.mismatched.len(),
            report.mismatched.len() + report.matching.len()
        );
    }

    tracing::info!("All images have the target aspect ratio.");

    Ok(())
}

/// Validate a version bump and export `NEEDS_UPDATE`.
pub fn check_version(current: &str, main: &str, project: &str) -> Result<()> {
    tracing::info!("Checking {} project version", project);

    let needs_update = folio_ci::compare_versions(current, main)?;
    folio_ci::set_output("NEEDS_UPDATE", &needs_update.to_string())?;

    Ok(())
}

/// Export the package version as `VERSION_<NAME>`.
pub fn export_version(name: &str, package: &Path) -> Result<()> {
    let version = folio_ci::version_from_package_json(package)?;
    let key = format!("VERSION_{}", name.to_uppercase());

    folio_ci::set_output(&key, &version)?;

    Ok(())
}
