//! Configuration file (folio.toml).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_site::{FreezeConfig, SiteConfig, SiteMeta};
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub content: ContentSection,
    #[serde(default)]
    pub freeze: FreezeSection,
    /// Display labels for tags
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct SiteSection {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentSection {
    #[serde(default = "default_content_dir")]
    pub dir: String,
    #[serde(default = "default_templates_dir")]
    pub templates: String,
    #[serde(rename = "static", default = "default_static_dir")]
    pub static_dir: String,
}

#[derive(Debug, Deserialize)]
pub struct FreezeSection {
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_true")]
    pub minify: bool,
    #[serde(default = "default_true")]
    pub remove_extra_files: bool,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: String::new(),
            author: String::new(),
            url: default_url(),
            base_url: default_base_url(),
        }
    }
}

impl Default for ContentSection {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
            templates: default_templates_dir(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for FreezeSection {
    fn default() -> Self {
        Self {
            output: default_output(),
            minify: true,
            remove_extra_files: true,
        }
    }
}

fn default_title() -> String {
    "Portfolio".to_string()
}
fn default_url() -> String {
    "http://examplesite.com".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_content_dir() -> String {
    "content".to_string()
}
fn default_templates_dir() -> String {
    "templates".to_string()
}
fn default_static_dir() -> String {
    "static".to_string()
}
fn default_output() -> String {
    "build".to_string()
}
fn default_true() -> bool {
    true
}

impl ConfigFile {
    /// Settings for loading the site.
    pub fn site_config(&self) -> SiteConfig {
        SiteConfig {
            content_dir: PathBuf::from(&self.content.dir),
            templates_dir: Some(PathBuf::from(&self.content.templates)),
            static_dir: PathBuf::from(&self.content.static_dir),
            meta: SiteMeta {
                title: self.site.title.clone(),
                description: self.site.description.clone(),
                author: self.site.author.clone(),
                url: self.site.url.clone(),
                base_url: self.site.base_url.clone(),
            },
            categories: self.categories.clone(),
            ..Default::default()
        }
    }

    /// Settings for freezing, with command line overrides.
    pub fn freeze_config(&self, output: Option<PathBuf>, minify: Option<bool>) -> FreezeConfig {
        FreezeConfig {
            output_dir: output.unwrap_or_else(|| PathBuf::from(&self.freeze.output)),
            minify: minify.unwrap_or(self.freeze.minify),
            remove_extra_files: self.freeze.remove_extra_files,
        }
    }
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("folio.toml")).unwrap();
        let site = config.site_config();

        assert_eq!(site.meta.title, "Portfolio");
        assert_eq!(site.meta.url, "http://examplesite.com");
        assert_eq!(site.content_dir, PathBuf::from("content"));
        assert_eq!(config.freeze_config(None, None).output_dir, PathBuf::from("build"));
    }

    #[test]
    fn reads_partial_config() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("folio.toml");
        fs::write(
            &path,
            r#"
[site]
title = "Jane Doe"
base_url = "/jane/"

[content]
static = "assets"

[freeze]
minify = false

[categories]
python = "Python"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        let site = config.site_config();

        assert_eq!(site.meta.title, "Jane Doe");
        assert_eq!(site.meta.base_url, "/jane/");
        assert_eq!(site.static_dir, PathBuf::from("assets"));
        assert_eq!(site.templates_dir, Some(PathBuf::from("templates")));
        assert_eq!(site.categories.get("python").map(String::as_str), Some("Python"));

        let freeze = config.freeze_config(Some(PathBuf::from("out")), None);
        assert_eq!(freeze.output_dir, PathBuf::from("out"));
        assert!(!freeze.minify);
        assert!(freeze.remove_extra_files);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("folio.toml");
        fs::write(&path, "[site\ntitle = ").unwrap();

        assert!(load_config(&path).is_err());
    }
}
