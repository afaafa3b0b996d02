//! Step outputs for GitHub Actions.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::CiError;

/// Environment variable naming the file that collects step outputs.
pub const GITHUB_ENV: &str = "GITHUB_ENV";

/// Append `name=value` to the file named by `$GITHUB_ENV`.
pub fn set_output(name: &str, value: &str) -> Result<(), CiError> {
    let path = std::env::var_os(GITHUB_ENV).ok_or(CiError::MissingEnv(GITHUB_ENV))?;
    set_output_to(Path::new(&path), name, value)
}

/// Append `name=value` to an outputs file.
pub fn set_output_to(path: &Path, name: &str, value: &str) -> Result<(), CiError> {
    tracing::info!("Setting {}={}", name, value);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CiError::WriteError(format!("{}: {}", path.display(), e)))?;

    writeln!(file, "{}={}", name, value)
        .map_err(|e| CiError::WriteError(format!("{}: {}", path.display(), e)))
}

/// The `version` field of a `package.json`.
pub fn version_from_package_json(path: &Path) -> Result<String, CiError> {
    tracing::info!("Retrieving package version from {}", path.display());

    let source = fs::read_to_string(path).map_err(|e| CiError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let invalid = |message: String| CiError::InvalidPackage {
        path: path.display().to_string(),
        message,
    };

    let package: serde_json::Value =
        serde_json::from_str(&source).map_err(|e| invalid(e.to_string()))?;

    let version = package
        .get("version")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid("missing \"version\" string".to_string()))?;

    tracing::info!("Found version {}", version);

    Ok(version.to_string())
}
