//! Static site freezer.
//!
//! Renders every route of a [`Site`] into `<output>/<path>/index.html`, copies
//! static files, and writes a sitemap.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::assets::{AssetPipeline, DEFAULT_CSS_FILE};
use crate::routes::Route;
use crate::site::{Site, SiteError};

/// Configuration for freezing a site.
#[derive(Debug, Clone)]
pub struct FreezeConfig {
    /// Output directory
    pub output_dir: PathBuf,

    /// Minify copied stylesheets
    pub minify: bool,

    /// Delete files in the output directory that this run did not write
    pub remove_extra_files: bool,
}

impl Default for FreezeConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("build"),
            minify: true,
            remove_extra_files: true,
        }
    }
}

/// Result of a freeze.
#[derive(Debug)]
pub struct FreezeResult {
    /// Number of pages written
    pub pages: usize,

    /// Number of static files written
    pub assets: usize,

    /// Number of stale files removed
    pub removed: usize,

    /// Total time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur while freezing.
#[derive(Debug, thiserror::Error)]
pub enum FreezeError {
    #[error("Failed to render {route}: {source}")]
    Render { route: String, source: SiteError },

    #[error("Refusing to clean {0}: it contains the site sources")]
    UnsafeOutput(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Pre-renders a site into static files.
pub struct Freezer<'a> {
    site: &'a Site,
    config: FreezeConfig,
}

impl<'a> Freezer<'a> {
    pub fn new(site: &'a Site, config: FreezeConfig) -> Self {
        Self { site, config }
    }

    /// Freeze the site.
    pub fn freeze(&self) -> Result<FreezeResult, FreezeError> {
        let start = Instant::now();

        if self.config.remove_extra_files {
            self.check_output_is_safe()?;
        }

        fs::create_dir_all(&self.config.output_dir).map_err(write_error(&self.config.output_dir))?;

        let routes = self.site.routes();

        let mut written: Vec<PathBuf> = routes
            .par_iter()
            .map(|route| self.freeze_route(route))
            .collect::<Result<_, _>>()?;

        let pages = written.len();

        let assets = self.write_assets()?;
        let asset_count = assets.len();
        written.extend(assets);

        written.extend(self.write_sitemap(&routes)?);

        let removed = if self.config.remove_extra_files {
            self.remove_extra_files(&written)?
        } else {
            0
        };

        Ok(FreezeResult {
            pages,
            assets: asset_count,
            removed,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Render a single route and write it.
    fn freeze_route(&self, route: &Route) -> Result<PathBuf, FreezeError> {
        let html = self.site.render(route).map_err(|source| FreezeError::Render {
            route: route.path(),
            source,
        })?;

        let path = self.config.output_dir.join(route.output_file());
        write_file(&path, html)?;

        tracing::debug!("Froze {} -> {}", route, path.display());

        Ok(path)
    }

    /// Copy the static directory and the built-in stylesheet.
    fn write_assets(&self) -> Result<Vec<PathBuf>, FreezeError> {
        let static_out = self.config.output_dir.join("static");

        let default_css = static_out.join(DEFAULT_CSS_FILE);
        let css = AssetPipeline::default_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(css).unwrap_or_else(|_| css.to_string())
        } else {
            css.to_string()
        };
        write_file(&default_css, css)?;

        // Copied after the default stylesheet so a site can override it.
        let mut written = AssetPipeline::copy_static(
            &self.site.config().static_dir,
            &static_out,
            self.config.minify,
        )
        .map_err(|e| FreezeError::WriteError(e.to_string()))?;

        if !written.contains(&default_css) {
            written.push(default_css);
        }

        Ok(written)
    }

    /// Write `sitemap.xml` and `robots.txt`.
    fn write_sitemap(&self, routes: &[Route]) -> Result<Vec<PathBuf>, FreezeError> {
        let origin = self.site.config().meta.url.trim_end_matches('/');

        let urls: Vec<String> = routes
            .iter()
            .filter(|route| **route != Route::NotFound)
            .map(|route| {
                format!(
                    "  <url>\n    <loc>{}</loc>\n  </url>",
                    xml_escape(&format!("{}{}", origin, self.site.url_for(route)))
                )
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        let sitemap_path = self.config.output_dir.join("sitemap.xml");
        write_file(&sitemap_path, sitemap)?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}{}sitemap.xml",
            origin,
            self.site.config().meta.base_url
        );
        let robots_path = self.config.output_dir.join("robots.txt");
        write_file(&robots_path, robots)?;

        Ok(vec![sitemap_path, robots_path])
    }

    /// Delete files under the output directory that were not written.
    fn remove_extra_files(&self, written: &[PathBuf]) -> Result<usize, FreezeError> {
        let keep: HashSet<&Path> = written.iter().map(PathBuf::as_path).collect();
        let mut removed = 0;

        for entry in WalkDir::new(&self.config.output_dir)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if entry.file_type().is_dir() {
                // Only succeeds once the directory is empty.
                if fs::remove_dir(path).is_ok() {
                    tracing::debug!("Removed empty directory {}", path.display());
                }
                continue;
            }

            if !keep.contains(path) {
                fs::remove_file(path).map_err(write_error(path))?;
                tracing::info!("Removed stale file {}", path.display());
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// Cleaning an output directory that holds the content or static files
    /// would delete them.
    fn check_output_is_safe(&self) -> Result<(), FreezeError> {
        let Ok(output) = self.config.output_dir.canonicalize() else {
            // Does not exist yet, nothing to clean.
            return Ok(());
        };

        let config = self.site.config();
        let sources = [&config.content_dir, &config.static_dir];

        for source in sources {
            if let Ok(source) = source.canonicalize() {
                if source.starts_with(&output) {
                    return Err(FreezeError::UnsafeOutput(
                        self.config.output_dir.display().to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), FreezeError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error(parent))?;
    }

    fs::write(path, contents).map_err(write_error(path))
}

fn write_error(path: &Path) -> impl Fn(std::io::Error) -> FreezeError + '_ {
    move |e| FreezeError::WriteError(format!("{}: {}", path.display(), e))
}
