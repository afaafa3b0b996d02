//! The site: loaded content plus templates, rendered route by route.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use minijinja::{context, Value};
use serde::Serialize;
use serde_yaml::Mapping;

use folio_content::text::slugify;
use folio_content::{
    extract_tags, get_content, get_page, list_pages, similar_items, taxonomy_filter, Content,
    ContentError, Group, TAGS_FIELD,
};

use crate::routes::{Route, NOT_FOUND_PATH, RESERVED_PAGES};
use crate::templates::TemplateEngine;

/// Site-wide metadata exposed to templates as `site`.
#[derive(Debug, Clone, Serialize)]
pub struct SiteMeta {
    /// Site title
    pub title: String,
    /// Default meta description
    pub description: String,
    /// Author shown in the footer
    pub author: String,
    /// Absolute origin used for the sitemap
    pub url: String,
    /// Path prefix the site is served under, always ending in `/`
    pub base_url: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: String::new(),
            url: "http://examplesite.com".to_string(),
            base_url: "/".to_string(),
        }
    }
}

/// Configuration for loading a site.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Content directory (pages, portfolio, blog)
    pub content_dir: PathBuf,

    /// Directory of templates overriding the built-in ones
    pub templates_dir: Option<PathBuf>,

    /// Static files served under `/static/`
    pub static_dir: PathBuf,

    /// Metadata exposed to templates
    pub meta: SiteMeta,

    /// Display labels for tags
    pub categories: BTreeMap<String, String>,

    /// Number of related items shown on item pages
    pub similar_limit: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            templates_dir: Some(PathBuf::from("templates")),
            static_dir: PathBuf::from("static"),
            meta: SiteMeta::default(),
            categories: BTreeMap::new(),
            similar_limit: 3,
        }
    }
}

/// Errors that can occur when loading or rendering a site.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),
}

/// A loaded site.
pub struct Site {
    config: SiteConfig,
    content: Content,
    pages: Vec<String>,
    templates: TemplateEngine,
}

impl Site {
    /// Load content and set up templates.
    pub fn load(mut config: SiteConfig) -> Result<Self, SiteError> {
        if !config.meta.base_url.ends_with('/') {
            config.meta.base_url.push('/');
        }

        let content = get_content(&config.content_dir)?;
        let pages = list_pages(&config.content_dir)?;
        let templates = TemplateEngine::new(config.templates_dir.clone(), config.categories.clone());

        tracing::info!(
            "Loaded {} portfolio items, {} blog posts and {} pages from {}",
            content.portfolio.len(),
            content.blog.len(),
            pages.len(),
            config.content_dir.display()
        );

        Ok(Self {
            config,
            content,
            pages,
            templates,
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Every renderable route, in a stable order.
    pub fn routes(&self) -> Vec<Route> {
        let mut routes = vec![Route::Home];

        for group in Group::ALL {
            routes.push(match group {
                Group::Portfolio => Route::Portfolio,
                Group::Blog => Route::Blog,
            });
            routes.extend(
                self.content
                    .items(group)
                    .iter()
                    .map(|item| Route::item(group, &item.slug)),
            );
        }

        let tags: BTreeSet<String> = extract_tags(&self.content.portfolio)
            .iter()
            .map(|tag| slugify(tag))
            .filter(|slug| !slug.is_empty())
            .collect();
        routes.extend(tags.into_iter().map(Route::Tag));

        routes.extend(
            self.pages
                .iter()
                .filter(|name| !RESERVED_PAGES.contains(&name.as_str()))
                .map(|name| Route::Page(name.clone())),
        );

        routes.push(Route::NotFound);
        routes
    }

    /// Absolute path of a route including the base URL.
    pub fn url_for(&self, route: &Route) -> String {
        format!(
            "{}{}",
            self.config.meta.base_url.trim_end_matches('/'),
            route.path()
        )
    }

    /// Render a route to HTML.
    ///
    /// Items, pages and tags that do not exist yield [`SiteError::NotFound`].
    pub fn render(&self, route: &Route) -> Result<String, SiteError> {
        let base = self.base_context();
        let content = &self.content;

        let ctx = match route {
            Route::Home => context! {
                page => self.optional_page("home")?,
                portfolio_main => &content.portfolio_main,
                portfolio_high => &content.portfolio_high,
                blog_high => &content.blog_high,
                tags => extract_tags(&content.portfolio),
                ..base
            },
            Route::Portfolio => context! {
                page => self.optional_page("portfolio")?,
                items => &content.portfolio,
                portfolio_high => &content.portfolio_high,
                tags => extract_tags(&content.portfolio),
                ..base
            },
            Route::Blog => context! {
                page => self.optional_page("blog")?,
                items => &content.blog,
                blog_high => &content.blog_high,
                ..base
            },
            Route::PortfolioItem(slug) => self.item_context(Group::Portfolio, slug, base)?,
            Route::BlogPost(slug) => self.item_context(Group::Blog, slug, base)?,
            Route::Tag(key) => {
                let items = taxonomy_filter(&content.portfolio, TAGS_FIELD, key);
                if items.is_empty() {
                    return Err(SiteError::NotFound(route.path()));
                }

                let tag = extract_tags(&content.portfolio)
                    .into_iter()
                    .find(|tag| slugify(tag) == key.to_lowercase())
                    .unwrap_or_else(|| key.clone());

                context! { tag => tag, items => items, ..base }
            }
            Route::Page(name) => {
                if RESERVED_PAGES.contains(&name.as_str()) || !self.pages.contains(name) {
                    return Err(SiteError::NotFound(route.path()));
                }

                context! { name => name, page => get_page(&self.config.content_dir, name)?, ..base }
            }
            Route::NotFound => context! { path => NOT_FOUND_PATH, ..base },
        };

        self.render_template(route.template(), ctx)
    }

    /// Render the not-found page for a requested path.
    pub fn render_not_found(&self, path: &str) -> Result<String, SiteError> {
        let ctx = context! { path => path, ..self.base_context() };
        self.render_template(Route::NotFound.template(), ctx)
    }

    fn render_template(&self, template: &str, ctx: Value) -> Result<String, SiteError> {
        self.templates
            .render(template, ctx)
            .map_err(|e| SiteError::TemplateError(format!("{}: {}", template, e)))
    }

    fn item_context(&self, group: Group, slug: &str, base: Value) -> Result<Value, SiteError> {
        let Some(item) = self.content.find(group, slug) else {
            return Err(SiteError::NotFound(Route::item(group, slug).path()));
        };

        let similar = similar_items(item, self.content.items(group), self.config.similar_limit);

        Ok(context! { item => item, similar => similar, ..base })
    }

    /// A page backing an index route; missing pages render with no data.
    fn optional_page(&self, name: &str) -> Result<Mapping, SiteError> {
        match get_page(&self.config.content_dir, name) {
            Ok(page) => Ok(page),
            Err(ContentError::PageNotFound(_)) => Ok(Mapping::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn base_context(&self) -> Value {
        let nav_pages: Vec<&str> = self
            .pages
            .iter()
            .map(String::as_str)
            .filter(|name| !RESERVED_PAGES.contains(name))
            .collect();

        context! {
            site => &self.config.meta,
            categories => &self.config.categories,
            nav_pages => nav_pages,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// A site with four main portfolio items, two posts and an about page.
    pub(crate) fn sample_content() -> TempDir {
        let temp = tempdir().unwrap();
        let root = temp.path();

        for (num, name, tags) in [
            ("0001", "scraper", "[Python, Web]"),
            ("0002", "dashboard", "[Web]"),
            ("0003", "cli-tool", "[Rust]"),
            ("0004", "compiler", "[Rust, Python]"),
        ] {
            write(
                root,
                &format!("portfolio/{num}-{name}.yaml"),
                &format!(
                    "title: {name} project\nmain: true\ntags_filter: {tags}\ncontent_markdown: \"About **{name}**\"\n"
                ),
            );
        }

        write(
            root,
            "blog/0001-hello.yaml",
            "title: Hello\nhighlight: true\ncontent_markdown: \"# Hi there\"\n",
        );
        write(root, "blog/0002-update.yaml", "title: Update\n");
        write(
            root,
            "pages/home.yaml",
            "title: Welcome home\nintro_markdown: \"I build *things*\"\n",
        );
        write(
            root,
            "pages/about.yaml",
            "title: About me\ncontent_markdown: \"Born in a **terminal**\"\n",
        );

        temp
    }

    pub(crate) fn load(root: &Path) -> Site {
        Site::load(SiteConfig {
            content_dir: root.to_path_buf(),
            templates_dir: None,
            meta: SiteMeta {
                title: "Test Site".to_string(),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn enumerates_routes() {
        let temp = sample_content();
        let site = load(temp.path());

        let paths: Vec<String> = site.routes().iter().map(Route::path).collect();

        assert_eq!(
            paths,
            vec![
                "/",
                "/portfolio/",
                "/portfolio/compiler/",
                "/portfolio/cli-tool/",
                "/portfolio/dashboard/",
                "/portfolio/scraper/",
                "/blog/",
                "/blog/update/",
                "/blog/hello/",
                "/tags/python/",
                "/tags/rust/",
                "/tags/web/",
                "/about/",
                "/404.html",
            ]
        );
    }

    #[test]
    fn renders_home() {
        let temp = sample_content();
        let site = load(temp.path());

        let html = site.render(&Route::Home).unwrap();

        assert!(html.contains("<h1>Welcome home</h1>"));
        assert!(html.contains("I build <em>things</em>"));
        assert!(html.contains("scraper project"));
        assert!(html.contains("Highlighted posts"));
        assert!(html.contains(">About</a>"));
    }

    #[test]
    fn renders_item_with_similar_items() {
        let temp = sample_content();
        let site = load(temp.path());

        let html = site
            .render(&Route::PortfolioItem("compiler".to_string()))
            .unwrap();

        assert!(html.contains("<title>compiler project - Test Site</title>"));
        assert!(html.contains("About <strong>compiler</strong>"));
        assert!(html.contains("Related projects"));
        assert!(html.contains("cli-tool project"));
    }

    #[test]
    fn renders_blog_post_markdown() {
        let temp = sample_content();
        let site = load(temp.path());

        let html = site.render(&Route::BlogPost("hello".to_string())).unwrap();

        assert!(html.contains("<h1>Hi there</h1>"));
    }

    #[test]
    fn renders_tag_page() {
        let temp = sample_content();
        let site = load(temp.path());

        let html = site.render(&Route::Tag("rust".to_string())).unwrap();

        assert!(html.contains("<h1>Rust</h1>"));
        assert!(html.contains("compiler project"));
        assert!(html.contains("cli-tool project"));
        assert!(!html.contains("dashboard project"));
    }

    #[test]
    fn renders_static_page() {
        let temp = sample_content();
        let site = load(temp.path());

        let html = site.render(&Route::Page("about".to_string())).unwrap();

        assert!(html.contains("<h1>About me</h1>"));
        assert!(html.contains("Born in a <strong>terminal</strong>"));
    }

    #[test]
    fn unknown_targets_are_not_found() {
        let temp = sample_content();
        let site = load(temp.path());

        for route in [
            Route::PortfolioItem("missing".to_string()),
            Route::BlogPost("missing".to_string()),
            Route::Tag("missing".to_string()),
            Route::Page("missing".to_string()),
            Route::Page("home".to_string()),
        ] {
            assert!(
                matches!(site.render(&route), Err(SiteError::NotFound(_))),
                "{route}"
            );
        }
    }

    #[test]
    fn renders_not_found_page() {
        let temp = sample_content();
        let site = load(temp.path());

        let html = site.render_not_found("missing-thing").unwrap();

        assert!(html.contains("<code>missing-thing</code>"));
    }

    #[test]
    fn base_url_is_normalized() {
        let temp = sample_content();
        let site = Site::load(SiteConfig {
            content_dir: temp.path().to_path_buf(),
            templates_dir: None,
            meta: SiteMeta {
                base_url: "/me".to_string(),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();

        assert_eq!(site.config().meta.base_url, "/me/");
        assert_eq!(
            site.url_for(&Route::BlogPost("hello".to_string())),
            "/me/blog/hello/"
        );
        assert_eq!(site.url_for(&Route::Home), "/me/");
    }

    #[test]
    fn load_fails_on_invalid_content() {
        let temp = tempdir().unwrap();
        write(temp.path(), "portfolio/0001-only.yaml", "title: only\nmain: true\n");

        let result = Site::load(SiteConfig {
            content_dir: temp.path().to_path_buf(),
            ..Default::default()
        });

        assert!(matches!(
            result,
            Err(SiteError::Content(ContentError::InvalidPortfolioMain(1)))
        ));
    }

    #[test]
    fn skips_tags_without_a_slug() {
        let temp = sample_content();
        write(
            temp.path(),
            "portfolio/0005-symbols.yaml",
            "title: Symbols\ntags_filter: [\"++\", Rust]\n",
        );
        let site = load(temp.path());

        let paths: Vec<String> = site.routes().iter().map(Route::path).collect();

        assert!(!paths.contains(&"/tags//".to_string()));
        assert!(!paths.contains(&"/tags/".to_string()));
        assert!(paths.contains(&"/tags/rust/".to_string()));
    }

    #[test]
    fn encodes_slugs_in_links_and_urls() {
        let temp = sample_content();
        write(temp.path(), "blog/0003-my post.yaml", "title: Spaced\n");
        let site = load(temp.path());

        let route = Route::BlogPost("my post".to_string());
        assert!(site.routes().contains(&route));
        assert_eq!(site.url_for(&route), "/blog/my%20post/");

        let html = site.render(&Route::Blog).unwrap();
        assert!(html.contains("blog/my%20post/"));
    }

    #[test]
    fn drafts_have_no_routes() {
        let temp = sample_content();
        write(temp.path(), "blog/0003-wip.yaml", "title: WIP\ndraft: true\n");
        write(temp.path(), "pages/hidden.yaml", "title: Hidden\ndraft: true\n");
        let site = load(temp.path());

        let routes = site.routes();

        assert!(!routes.contains(&Route::BlogPost("wip".to_string())));
        assert!(!routes.contains(&Route::Page("hidden".to_string())));
        assert!(matches!(
            site.render(&Route::Page("hidden".to_string())),
            Err(SiteError::NotFound(_))
        ));
    }

    #[test]
    fn formats_item_dates() {
        let temp = sample_content();
        write(
            temp.path(),
            "blog/0003-dated.yaml",
            "title: Dated\ndate: 2024-02-09\n",
        );
        let site = load(temp.path());

        let html = site.render(&Route::BlogPost("dated".to_string())).unwrap();

        assert!(html.contains(">February 9, 2024</time>"));
    }
}
