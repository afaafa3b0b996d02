//! Scaffold a new folio site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Files written by `folio init`, relative to the working directory.
const CONTENT_FILES: [(&str, &str); 8] = [
    ("content/pages/home.yaml", HOME_PAGE),
    ("content/pages/about.yaml", ABOUT_PAGE),
    ("content/portfolio/0001-web-scraper.yaml", PORTFOLIO_SCRAPER),
    ("content/portfolio/0002-data-pipeline.yaml", PORTFOLIO_PIPELINE),
    ("content/portfolio/0003-home-server.yaml", PORTFOLIO_SERVER),
    ("content/portfolio/0004-ml-model.yaml", PORTFOLIO_MODEL),
    ("content/blog/0001-hello-world.yaml", BLOG_HELLO),
    ("static/images/.gitkeep", ""),
];

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    scaffold(config_path, Path::new("."), yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio serve' to start the server.");

    Ok(())
}

/// Write the config and sample content under `root`. Existing files are only
/// replaced when `overwrite` is set.
fn scaffold(config_path: &Path, root: &Path, overwrite: bool) -> Result<()> {
    let config_path = root.join(config_path);

    if config_path.exists() && !overwrite {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    for (relative, contents) in CONTENT_FILES {
        let path = root.join(relative);

        if path.exists() && !overwrite {
            tracing::debug!("Keeping {}", path.display());
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", relative);
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Folio Configuration

[site]
title = "My Portfolio"
description = "Projects and writing"
author = ""
# Absolute origin, used for the sitemap
url = "http://examplesite.com"
# Path prefix when served from a subdirectory
base_url = "/"

[content]
dir = "content"
templates = "templates"
static = "static"

[freeze]
output = "build"
minify = true
# Delete files in the output directory that were not generated
remove_extra_files = true

# Display labels for tags
[categories]
AI = "🤖 ML/AI"
API = "🔌 API"
DE = "⚙️ DE"
cloud_devops = "☁️ Cloud/DevOps"
git = "🔀 GIT"
hardware = "🖥️ Hardware"
others = "📦 Others"
python = "🐍 Python"
tools = "🛠️ Tools/Utils"
web = "🌍 Web"
"#;

const HOME_PAGE: &str = r#"title: Hi, I'm a developer
intro_markdown: |
  I build **data tools** and small web services.
  Below are a few projects I'm proud of.
"#;

const ABOUT_PAGE: &str = r#"title: About me
content_markdown: |
  ## Background

  Write a few paragraphs about yourself here.
"#;

const PORTFOLIO_SCRAPER: &str = r#"title: Web scraper
description: Collects listings every night and stores them for analysis.
image: /static/images/web-scraper.jpg
main: true
highlight: true
tags_filter: [python, web]
content_markdown: |
  A scheduled scraper written in Python.
"#;

const PORTFOLIO_PIPELINE: &str = r#"title: Data pipeline
description: Batch pipeline turning raw files into reporting tables.
main: true
tags_filter: [DE, python]
content_markdown: |
  Orchestrated with a scheduler and tested end to end.
"#;

const PORTFOLIO_SERVER: &str = r#"title: Home server
description: A low-power server running self-hosted services.
main: true
tags_filter: [hardware, cloud_devops]
content_markdown: |
  Containers, backups and monitoring on a single board computer.
"#;

const PORTFOLIO_MODEL: &str = r#"title: Price model
description: Predicts prices from historical listings.
main: true
highlight: true
tags_filter: [AI, python]
content_markdown: |
  Trained on the data collected by the scraper.
"#;

const BLOG_HELLO: &str = r#"title: Hello world
date: 2024-01-01
highlight: true
tags_filter: [others]
content_markdown: |
  The first post on this site.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn scaffolds_site() {
        let temp = tempdir().unwrap();

        scaffold(Path::new("folio.toml"), temp.path(), false).unwrap();

        let config = fs::read_to_string(temp.path().join("folio.toml")).unwrap();
        assert!(config.contains("[categories]"));

        for (relative, _) in CONTENT_FILES {
            assert!(temp.path().join(relative).is_file(), "{relative} missing");
        }
    }

    #[test]
    fn scaffolded_site_loads() {
        let temp = tempdir().unwrap();
        scaffold(Path::new("folio.toml"), temp.path(), false).unwrap();

        let config = crate::config::load_config(&temp.path().join("folio.toml")).unwrap();
        let mut site_config = config.site_config();
        site_config.content_dir = temp.path().join("content");
        site_config.templates_dir = None;

        let site = folio_site::Site::load(site_config).unwrap();

        assert_eq!(site.content().portfolio_main.len(), 4);
        assert_eq!(config.categories.get("web").map(String::as_str), Some("🌍 Web"));
    }

    #[test]
    fn keeps_existing_config_without_overwrite() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("folio.toml"), "# mine").unwrap();

        scaffold(Path::new("folio.toml"), temp.path(), false).unwrap();

        assert_eq!(
            fs::read_to_string(temp.path().join("folio.toml")).unwrap(),
            "# mine"
        );
        assert!(!temp.path().join("content").exists());

        scaffold(Path::new("folio.toml"), temp.path(), true).unwrap();
        assert!(temp.path().join("content/pages/home.yaml").is_file());
    }
}
