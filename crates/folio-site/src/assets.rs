//! Static asset handling for frozen sites.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// File name of the built-in stylesheet under `static/`.
pub const DEFAULT_CSS_FILE: &str = "folio.css";

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// The built-in stylesheet used by the default templates.
    pub fn default_css() -> &'static str {
        DEFAULT_CSS
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }

    /// Copy every file under `source` into `dest`, keeping the layout.
    ///
    /// Stylesheets are minified when `minify` is set; a stylesheet that fails
    /// to parse is copied unchanged. Returns the written files.
    pub fn copy_static(source: &Path, dest: &Path, minify: bool) -> io::Result<Vec<PathBuf>> {
        let mut written = Vec::new();

        if !source.is_dir() {
            tracing::debug!("No static directory at {}", source.display());
            return Ok(written);
        }

        for entry in WalkDir::new(source).follow_links(true) {
            let entry = entry.map_err(io::Error::other)?;
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(source).unwrap_or(path);
            let target = dest.join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }

            let is_css = path.extension().and_then(|e| e.to_str()) == Some("css");

            if minify && is_css {
                let css = fs::read_to_string(path)?;
                let css = match Self::minify_css(&css) {
                    Ok(minified) => minified,
                    Err(e) => {
                        tracing::warn!("Copying {} unminified: {}", path.display(), e);
                        css
                    }
                };
                fs::write(&target, css)?;
            } else {
                fs::copy(path, &target)?;
            }

            written.push(target);
        }

        Ok(written)
    }
}

const DEFAULT_CSS: &str = r#"/* folio default theme */

:root {
  --background: #fdfdfc;
  --foreground: #1f2328;
  --muted: #6b7280;
  --accent: #2563eb;
  --border: #e5e7eb;
  --content-max-width: 1100px;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: var(--foreground);
  line-height: 1.6;
}

a {
  color: var(--accent);
}

.site-header,
.main,
.site-footer {
  max-width: var(--content-max-width);
  margin: 0 auto;
  padding: 1rem 1.5rem;
}

.site-header {
  display: flex;
  justify-content: space-between;
  align-items: center;
  border-bottom: 1px solid var(--border);
}

.site-title {
  font-weight: 700;
  font-size: 1.25rem;
  color: var(--foreground);
  text-decoration: none;
}

.site-nav a {
  margin-left: 1rem;
  text-decoration: none;
}

.grid {
  display: grid;
  grid-template-columns: repeat(4, minmax(0, 1fr));
  gap: 1.5rem;
}

@media (max-width: 900px) {
  .grid {
    grid-template-columns: repeat(2, minmax(0, 1fr));
  }
}

.card {
  border: 1px solid var(--border);
  border-radius: 0.5rem;
  padding: 1rem;
}

.card img,
.item img {
  width: 100%;
  aspect-ratio: 16 / 9;
  object-fit: cover;
  border-radius: 0.375rem;
}

.tags {
  list-style: none;
  padding: 0;
  display: flex;
  flex-wrap: wrap;
  gap: 0.5rem;
}

.tags a {
  font-size: 0.875rem;
  color: var(--muted);
}

pre {
  background: #f5f5f5;
  padding: 1rem;
  border-radius: 0.5rem;
  overflow-x: auto;
}

.site-footer {
  color: var(--muted);
  border-top: 1px solid var(--border);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn minifies_css() {
        let css = "body {\n  color: red;\n}\n";

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert_eq!(minified, "body{color:red}");
    }

    #[test]
    fn default_css_is_valid() {
        assert!(AssetPipeline::minify_css(AssetPipeline::default_css()).is_ok());
    }

    #[test]
    fn copies_static_tree() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("static");
        let dest = temp.path().join("out");

        fs::create_dir_all(source.join("img")).unwrap();
        fs::write(source.join("img/logo.png"), [0u8, 1, 2]).unwrap();
        fs::write(source.join("site.css"), "a {\n  color: red;\n}\n").unwrap();

        let written = AssetPipeline::copy_static(&source, &dest, true).unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(fs::read(dest.join("img/logo.png")).unwrap(), vec![0u8, 1, 2]);
        assert_eq!(
            fs::read_to_string(dest.join("site.css")).unwrap(),
            "a{color:red}"
        );
    }

    #[test]
    fn missing_static_dir_copies_nothing() {
        let temp = tempdir().unwrap();

        let written =
            AssetPipeline::copy_static(&temp.path().join("none"), temp.path(), true).unwrap();

        assert!(written.is_empty());
    }
}
