//! Directory-convention content loader.
//!
//! ```text
//! content/
//! ├── pages/home.yaml
//! ├── portfolio/0001-first-project.yaml
//! └── blog/0001-hello-world.yaml
//! ```
//!
//! Items are ordered by file name, newest (highest number) first. The number
//! and the extension are stripped to form the item slug.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::markdown::transform_markdown;
use crate::taxonomy::TAGS_FIELD;

/// Separates the ordering number from the item name in file names.
pub const NUM_SEPARATOR: char = '-';

/// The home page shows portfolio items in rows of this many.
pub const PORTFOLIO_MAIN_MULTIPLE: usize = 4;

/// Fields computed from the file name; content may not set them.
pub const RESERVED_FIELDS: [&str; 2] = ["slug", "number"];

/// Items and pages with this flag set are not published.
pub const DRAFT_FIELD: &str = "draft";

const PAGES_DIR: &str = "pages";

/// A group of numbered content items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Portfolio,
    Blog,
}

impl Group {
    /// Every item group, in load order.
    pub const ALL: [Group; 2] = [Group::Portfolio, Group::Blog];

    /// Directory name (and URL segment) of the group.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Portfolio => "portfolio",
            Self::Blog => "blog",
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A portfolio project or blog post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    /// File name without ordering prefix and extension
    pub slug: String,

    /// Ordering prefix as written in the file name
    pub number: String,

    /// YAML fields, Markdown already rendered
    #[serde(flatten)]
    pub data: Mapping,
}

impl Item {
    /// Look up a raw field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Look up a string field.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// A boolean flag; missing or non-boolean values count as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Values of the `tags_filter` sequence.
    pub fn tags(&self) -> Vec<&str> {
        match self.get(TAGS_FIELD) {
            Some(Value::Sequence(values)) => values.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// All items of a site, with the subsets shown on summary pages.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Content {
    pub portfolio: Vec<Item>,
    pub portfolio_high: Vec<Item>,
    pub portfolio_main: Vec<Item>,
    pub blog: Vec<Item>,
    pub blog_high: Vec<Item>,
}

impl Content {
    /// Every item of a group.
    pub fn items(&self, group: Group) -> &[Item] {
        match group {
            Group::Portfolio => &self.portfolio,
            Group::Blog => &self.blog,
        }
    }

    /// Find an item by slug.
    pub fn find(&self, group: Group, slug: &str) -> Option<&Item> {
        self.items(group).iter().find(|item| item.slug == slug)
    }
}

/// Errors that can occur when loading content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Invalid YAML in {path}: {message}")]
    InvalidYaml { path: String, message: String },

    #[error("Expected a mapping at the root of {0}")]
    NotAMapping(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Missing ordering prefix in file name: {0}")]
    MissingPrefix(String),

    #[error("Duplicate {group} item: {slug}")]
    DuplicateSlug { group: Group, slug: String },

    #[error("{path} sets the reserved field '{field}'")]
    ReservedField { path: String, field: String },

    #[error("Expected a non-zero multiple of 4 main portfolio items, found {0}")]
    InvalidPortfolioMain(usize),
}

/// Read a YAML file into an ordered mapping.
///
/// An empty document yields an empty mapping.
pub fn read_yaml(path: &Path) -> Result<Mapping, ContentError> {
    let source = fs::read_to_string(path).map_err(|e| ContentError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let value: Value = serde_yaml::from_str(&source).map_err(|e| ContentError::InvalidYaml {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ContentError::NotAMapping(path.display().to_string())),
    }
}

/// Load a static page from `<root>/pages/<name>.yaml`.
pub fn get_page(root: &Path, name: &str) -> Result<Mapping, ContentError> {
    let path = root.join(PAGES_DIR).join(format!("{name}.yaml"));

    if !path.is_file() {
        return Err(ContentError::PageNotFound(name.to_string()));
    }

    let mut page = read_yaml(&path)?;
    transform_markdown(&mut page);

    Ok(page)
}

/// Names of every published page under `<root>/pages/`, sorted.
pub fn list_pages(root: &Path) -> Result<Vec<String>, ContentError> {
    let dir = root.join(PAGES_DIR);
    let mut names = Vec::new();

    for filename in yaml_file_names(&dir)? {
        let Some(name) = filename.strip_suffix(".yaml") else {
            continue;
        };

        if is_draft(&read_yaml(&dir.join(&filename))?) {
            tracing::debug!("Skipping draft page {}", name);
            continue;
        }

        names.push(name.to_string());
    }

    names.sort();
    Ok(names)
}

/// Load every item of a group, newest first.
pub fn get_items(root: &Path, group: Group) -> Result<Vec<Item>, ContentError> {
    let dir = root.join(group.as_str());

    let mut filenames = yaml_file_names(&dir)?;
    filenames.sort();
    filenames.reverse();

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(filenames.len());

    for filename in filenames {
        let Some((number, rest)) = filename.split_once(NUM_SEPARATOR) else {
            return Err(ContentError::MissingPrefix(filename));
        };

        let slug = rest.split('.').next().unwrap_or(rest).to_string();

        let path = dir.join(&filename);
        let mut data = read_yaml(&path)?;

        if let Some(field) = RESERVED_FIELDS.iter().find(|f| data.contains_key(**f)) {
            return Err(ContentError::ReservedField {
                path: path.display().to_string(),
                field: field.to_string(),
            });
        }

        if is_draft(&data) {
            tracing::debug!("Skipping draft {} item {}", group, slug);
            continue;
        }

        if !seen.insert(slug.clone()) {
            return Err(ContentError::DuplicateSlug { group, slug });
        }

        transform_markdown(&mut data);

        items.push(Item {
            slug,
            number: number.to_string(),
            data,
        });
    }

    tracing::debug!("Loaded {} {} items", items.len(), group);

    Ok(items)
}

/// Load both item groups and split out highlighted and main items.
///
/// The home page lays portfolio items out in rows, so the number of
/// `main` portfolio items must be a non-zero multiple of
/// [`PORTFOLIO_MAIN_MULTIPLE`].
pub fn get_content(root: &Path) -> Result<Content, ContentError> {
    let portfolio = get_items(root, Group::Portfolio)?;
    let blog = get_items(root, Group::Blog)?;

    let portfolio_high = flagged(&portfolio, "highlight");
    let blog_high = flagged(&blog, "highlight");
    let portfolio_main = flagged(&portfolio, "main");

    let main_count = portfolio_main.len();
    if main_count == 0 || main_count % PORTFOLIO_MAIN_MULTIPLE != 0 {
        return Err(ContentError::InvalidPortfolioMain(main_count));
    }

    Ok(Content {
        portfolio,
        portfolio_high,
        portfolio_main,
        blog,
        blog_high,
    })
}

fn is_draft(data: &Mapping) -> bool {
    data.get(DRAFT_FIELD).and_then(Value::as_bool).unwrap_or(false)
}

fn flagged(items: &[Item], flag: &str) -> Vec<Item> {
    items.iter().filter(|item| item.flag(flag)).cloned().collect()
}

/// File names of the YAML files directly inside `dir`.
///
/// A missing directory is treated as empty. Hidden files are skipped.
fn yaml_file_names(dir: &Path) -> Result<Vec<String>, ContentError> {
    if !dir.is_dir() {
        tracing::debug!("Content directory not found: {}", dir.display());
        return Ok(Vec::new());
    }

    let read_error = |e: std::io::Error| ContentError::Read {
        path: dir.display().to_string(),
        message: e.to_string(),
    };

    let mut names = Vec::new();

    for entry in fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!("Skipping non UTF-8 file name: {}", path.display());
            continue;
        };

        if name.starts_with('.') {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != "yaml" && ext != "yml" {
            tracing::debug!("Skipping non-YAML file: {}", path.display());
            continue;
        }

        names.push(name.to_string());
    }

    Ok(names)
}
