//! CI checks for folio sites.
//!
//! Image aspect-ratio validation, release version checks, and step outputs
//! for GitHub Actions.

pub mod aspect;
pub mod output;
pub mod version;

pub use aspect::{check_aspect_ratio, AspectRatio, AspectReport, IMAGE_EXTENSIONS};
pub use output::{set_output, set_output_to, version_from_package_json, GITHUB_ENV};
pub use version::{compare_versions, parse_version, versions_are_consecutive};

/// Errors raised by the CI checks.
#[derive(Debug, thiserror::Error)]
pub enum CiError {
    #[error("Invalid aspect ratio '{0}', expected W:H")]
    InvalidAspectRatio(String),

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to read image {path}: {message}")]
    Image { path: String, message: String },

    #[error("Invalid version '{0}'")]
    InvalidVersion(String),

    #[error("Only one version increase at a time allowed ({main} -> {current})")]
    NotConsecutive { current: String, main: String },

    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Invalid package file {path}: {message}")]
    InvalidPackage { path: String, message: String },
}
