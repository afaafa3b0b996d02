//! Release version checks.
//!
//! A pull request may bump the version by at most one step: one patch, one
//! minor (resetting patch), or one major (resetting minor and patch).

use semver::Version;

use crate::CiError;

/// Parse a version, accepting a leading `v` and missing minor or patch
/// components (`1.2` is `1.2.0`).
pub fn parse_version(input: &str) -> Result<Version, CiError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

    let (core, rest) = match trimmed.find(['-', '+']) {
        Some(i) => trimmed.split_at(i),
        None => (trimmed, ""),
    };

    let components = core.split('.').count();
    let padded = match components {
        1 => format!("{core}.0.0{rest}"),
        2 => format!("{core}.0{rest}"),
        _ => trimmed.to_string(),
    };

    Version::parse(&padded).map_err(|_| CiError::InvalidVersion(input.to_string()))
}

/// Whether `current` is at most one step ahead of `main`.
pub fn versions_are_consecutive(current: &Version, main: &Version) -> bool {
    let delta = |a: u64, b: u64| a as i128 - b as i128;

    let major = delta(current.major, main.major);
    let minor = delta(current.minor, main.minor);
    let patch = delta(current.patch, main.patch);

    if major > 1 || minor > 1 || patch > 1 {
        return false;
    }

    if major == 1 {
        return minor <= 0 && patch <= 0 && current.minor == 0 && current.patch == 0;
    }

    if minor == 1 {
        return patch <= 0 && current.patch == 0;
    }

    true
}

/// Validate a version bump and report whether the version still needs one.
///
/// Fails when the versions are more than one step apart. Returns `true`
/// when `current` is not ahead of `main`.
pub fn compare_versions(current: &str, main: &str) -> Result<bool, CiError> {
    tracing::info!("Comparing version {} against {}", current, main);

    let current_version = parse_version(current)?;
    let main_version = parse_version(main)?;

    if !versions_are_consecutive(&current_version, &main_version) {
        return Err(CiError::NotConsecutive {
            current: current.to_string(),
            main: main.to_string(),
        });
    }

    tracing::info!("Versions are consecutive");

    let needs_update = current_version <= main_version;
    tracing::info!("Needs update: {}", needs_update);

    Ok(needs_update)
}
