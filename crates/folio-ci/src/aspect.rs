//! Image aspect-ratio validation.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::CiError;

/// File extensions treated as images, matched against lowercase names.
pub const IMAGE_EXTENSIONS: [&str; 6] = [".png", ".jpg", ".jpeg", ".bmp", ".gif", ".ico"];

/// A target aspect ratio such as `16:9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether an image of the given size has exactly this ratio.
    pub fn matches(&self, width: u32, height: u32) -> bool {
        u64::from(width) * u64::from(self.height) == u64::from(height) * u64::from(self.width)
    }
}

impl FromStr for AspectRatio {
    type Err = CiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CiError::InvalidAspectRatio(s.to_string());

        let (width, height) = s.split_once(':').ok_or_else(invalid)?;
        let width: u32 = width.trim().parse().map_err(|_| invalid())?;
        let height: u32 = height.trim().parse().map_err(|_| invalid())?;

        if width == 0 || height == 0 {
            return Err(invalid());
        }

        Ok(Self { width, height })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Outcome of an aspect-ratio check.
#[derive(Debug, Default)]
pub struct AspectReport {
    /// Images with the target ratio
    pub matching: Vec<String>,

    /// Images with another ratio, with their size
    pub mismatched: Vec<(String, u32, u32)>,
}

impl AspectReport {
    pub fn all_match(&self) -> bool {
        self.mismatched.is_empty()
    }
}

/// Check every image directly inside `dir` against `target`.
///
/// Files without an image extension are ignored, as are subdirectories.
/// Symlinks are followed.
pub fn check_aspect_ratio(dir: &Path, target: &AspectRatio) -> Result<AspectReport, CiError> {
    let entries = fs::read_dir(dir).map_err(|e| CiError::Read {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .filter(|name| is_image(name))
        .collect();
    names.sort();

    let mut report = AspectReport::default();

    for name in names {
        let path = dir.join(&name);
        let (width, height) = image::image_dimensions(&path).map_err(|e| CiError::Image {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        if target.matches(width, height) {
            tracing::info!("{} has a {} aspect ratio.", name, target);
            report.matching.push(name);
        } else {
            tracing::warn!(
                "{} has an aspect ratio of {:.2}, which is not {}.",
                name,
                f64::from(width) / f64::from(height),
                target
            );
            report.mismatched.push((name, width, height));
        }
    }

    Ok(report)
}

fn is_image(name: &str) -> bool {
    let name = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn save(dir: &Path, name: &str, width: u32, height: u32) {
        RgbImage::new(width, height).save(dir.join(name)).unwrap();
    }

    #[test]
    fn parses_ratios() {
        assert_eq!("16:9".parse::<AspectRatio>().unwrap(), AspectRatio::new(16, 9));
        assert_eq!("1:1".parse::<AspectRatio>().unwrap().to_string(), "1:1");

        for bad in ["16-9", "16:", ":9", "16:0", "a:b", "1:2:3"] {
            assert!(
                matches!(bad.parse::<AspectRatio>(), Err(CiError::InvalidAspectRatio(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn compares_exactly() {
        let ratio = AspectRatio::new(16, 9);

        assert!(ratio.matches(1920, 1080));
        assert!(ratio.matches(32, 18));
        assert!(!ratio.matches(1920, 1081));
        assert!(!ratio.matches(1080, 1920));
    }

    #[test]
    fn reports_mismatched_images() {
        let temp = tempdir().unwrap();
        save(temp.path(), "wide.png", 32, 18);
        save(temp.path(), "SHOUT.PNG", 16, 9);
        save(temp.path(), "square.png", 10, 10);
        fs::write(temp.path().join("notes.txt"), "not an image").unwrap();
        fs::create_dir(temp.path().join("nested.png")).unwrap();

        let report = check_aspect_ratio(temp.path(), &AspectRatio::new(16, 9)).unwrap();

        assert_eq!(report.matching, vec!["SHOUT.PNG", "wide.png"]);
        assert_eq!(report.mismatched, vec![("square.png".to_string(), 10, 10)]);
        assert!(!report.all_match());
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_images() {
        let images = tempdir().unwrap();
        let linked = tempdir().unwrap();
        save(images.path(), "cover.png", 4, 3);
        std::os::unix::fs::symlink(images.path().join("cover.png"), linked.path().join("cover.png"))
            .unwrap();
        std::os::unix::fs::symlink(images.path(), linked.path().join("dir.png")).unwrap();

        let report = check_aspect_ratio(linked.path(), &AspectRatio::new(4, 3)).unwrap();

        assert_eq!(report.matching, vec!["cover.png"]);
        assert!(report.mismatched.is_empty());
    }

    #[test]
    fn empty_directory_passes() {
        let temp = tempdir().unwrap();

        let report = check_aspect_ratio(temp.path(), &AspectRatio::new(1, 1)).unwrap();

        assert!(report.all_match());
    }

    #[test]
    fn unreadable_image_is_an_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("broken.png"), b"not png").unwrap();

        let result = check_aspect_ratio(temp.path(), &AspectRatio::new(1, 1));

        assert!(matches!(result, Err(CiError::Image { .. })));
    }
}
