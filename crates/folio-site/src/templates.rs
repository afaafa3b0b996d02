//! Template engine for rendering site pages.
//!
//! Templates are looked up in the site's templates directory first and fall
//! back to the built-in defaults, so a site can override any subset of them.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use folio_content::text;
use minijinja::{Environment, Error, ErrorKind, Value};

use crate::routes::encode_segment;

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a template engine.
    ///
    /// `categories` maps tag keys to display labels for the `category` filter.
    pub fn new(templates_dir: Option<PathBuf>, categories: BTreeMap<String, String>) -> Self {
        let mut env = Environment::new();

        env.set_loader(move |name| {
            if let Some(dir) = &templates_dir {
                let path = dir.join(name);
                if path.is_file() {
                    return fs::read_to_string(&path).map(Some).map_err(|e| {
                        Error::new(
                            ErrorKind::InvalidOperation,
                            format!("Failed to read template {}: {}", path.display(), e),
                        )
                    });
                }
            }

            Ok(builtin_template(name).map(str::to_string))
        });

        env.add_filter("slugify", |value: String| text::slugify(&value));
        env.add_filter("humanize", |value: String| text::humanize(&value));
        env.add_filter("titleify", |value: String| text::titleify(&value));
        env.add_filter("plainify", |value: String| text::plainify(&value));
        env.add_filter("markdownify", |value: String, block: Option<bool>| {
            Value::from_safe_string(text::markdownify(&value, block.unwrap_or(false)))
        });
        env.add_filter("url_segment", |value: String| encode_segment(&value));
        env.add_filter("date", |value: Value, pattern: Option<String>| {
            let pattern = pattern.as_deref().unwrap_or(text::DEFAULT_DATE_FORMAT);
            let raw = value.to_string();
            text::format_date(&raw, pattern).ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidOperation,
                    format!("cannot format {raw:?} with {pattern:?}"),
                )
            })
        });
        env.add_filter("category", move |key: String| {
            categories.get(&key).cloned().unwrap_or(key)
        });

        Self { env }
    }

    /// Render a template with the given context.
    pub fn render(&self, template: &str, context: Value) -> Result<String, Error> {
        let tmpl = self.env.get_template(template)?;
        tmpl.render(context)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(None, BTreeMap::new())
    }
}

/// Built-in template source by name.
pub fn builtin_template(name: &str) -> Option<&'static str> {
    match name {
        "base.html" => Some(BASE_TEMPLATE),
        "card.html" => Some(CARD_TEMPLATE),
        "home.html" => Some(HOME_TEMPLATE),
        "portfolio.html" => Some(PORTFOLIO_TEMPLATE),
        "portfolio_item.html" => Some(PORTFOLIO_ITEM_TEMPLATE),
        "blog.html" => Some(BLOG_TEMPLATE),
        "blog_post.html" => Some(BLOG_POST_TEMPLATE),
        "tag.html" => Some(TAG_TEMPLATE),
        "page.html" => Some(PAGE_TEMPLATE),
        "404.html" => Some(NOT_FOUND_TEMPLATE),
        _ => None,
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{% block title %}{{ site.title }}{% endblock %}</title>
  {% if site.description %}<meta name="description" content="{{ site.description }}">{% endif %}
  <link rel="stylesheet" href="{{ site.base_url }}static/folio.css">
</head>
<body>
  <header class="site-header">
    <a href="{{ site.base_url }}" class="site-title">{{ site.title }}</a>
    <nav class="site-nav">
      <a href="{{ site.base_url }}portfolio/">Portfolio</a>
      <a href="{{ site.base_url }}blog/">Blog</a>
      {% for name in nav_pages %}<a href="{{ site.base_url }}{{ name | url_segment }}/">{{ name | titleify }}</a>
      {% endfor %}
    </nav>
  </header>
  <main class="main">
    {% block content %}{% endblock %}
  </main>
  <footer class="site-footer">
    {% if site.author %}<p>&copy; {{ site.author }}</p>{% endif %}
  </footer>
</body>
</html>"##;

const CARD_TEMPLATE: &str = r##"<article class="card">
  {% if item.image %}<img src="{{ item.image }}" alt="{{ item.title }}">{% endif %}
  <h3><a href="{{ site.base_url }}{{ section }}/{{ item.slug | url_segment }}/">{{ item.title | default(item.slug | titleify) }}</a></h3>
  {% if item.date %}<time datetime="{{ item.date | date }}">{{ item.date | date("%B %-d, %Y") }}</time>{% endif %}
  {% if item.description %}<p>{{ item.description }}</p>{% endif %}
  {% if item.tags_filter %}
  <ul class="tags">
    {% for tag in item.tags_filter %}<li><a href="{{ site.base_url }}tags/{{ tag | slugify | url_segment }}/">{{ tag | category }}</a></li>
    {% endfor %}
  </ul>
  {% endif %}
</article>"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<section class="intro">
  <h1>{{ page.title | default(site.title) }}</h1>
  {% if page.intro_markdown %}{{ page.intro_markdown | safe }}{% endif %}
</section>

<section class="portfolio-main">
  <h2>Projects</h2>
  <div class="grid">
  {% with section = "portfolio" %}{% for item in portfolio_main %}{% include "card.html" %}{% endfor %}{% endwith %}
  </div>
  <a href="{{ site.base_url }}portfolio/">All projects</a>
</section>

{% if blog_high %}
<section class="blog-highlights">
  <h2>Highlighted posts</h2>
  {% with section = "blog" %}{% for item in blog_high %}{% include "card.html" %}{% endfor %}{% endwith %}
  <a href="{{ site.base_url }}blog/">All posts</a>
</section>
{% endif %}
{% endblock %}"##;

const PORTFOLIO_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block title %}{{ page.title | default("Portfolio") }} - {{ site.title }}{% endblock %}

{% block content %}
<h1>{{ page.title | default("Portfolio") }}</h1>
{% if page.intro_markdown %}{{ page.intro_markdown | safe }}{% endif %}

{% if tags %}
<ul class="tags">
  {% for tag in tags %}<li><a href="{{ site.base_url }}tags/{{ tag | slugify | url_segment }}/">{{ tag | category }}</a></li>
  {% endfor %}
</ul>
{% endif %}

{% if portfolio_high %}
<h2>Highlighted</h2>
<div class="grid">
{% with section = "portfolio" %}{% for item in portfolio_high %}{% include "card.html" %}{% endfor %}{% endwith %}
</div>
{% endif %}

<h2>All projects</h2>
<div class="grid">
{% with section = "portfolio" %}{% for item in items %}{% include "card.html" %}{% endfor %}{% endwith %}
</div>
{% endblock %}"##;

const PORTFOLIO_ITEM_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block title %}{{ item.title | default(item.slug | titleify) }} - {{ site.title }}{% endblock %}

{% block content %}
<article class="item">
  <h1>{{ item.title | default(item.slug | titleify) }}</h1>
  {% if item.image %}<img src="{{ item.image }}" alt="{{ item.title }}">{% endif %}
  {% if item.description %}<p class="lead">{{ item.description }}</p>{% endif %}
  {% if item.link %}<p><a href="{{ item.link }}">{{ item.link }}</a></p>{% endif %}
  {% if item.content_markdown %}<div class="content">{{ item.content_markdown | safe }}</div>{% endif %}
</article>

{% if similar %}
<aside class="similar">
  <h2>Related projects</h2>
  <div class="grid">
  {% with section = "portfolio" %}{% for item in similar %}{% include "card.html" %}{% endfor %}{% endwith %}
  </div>
</aside>
{% endif %}
{% endblock %}"##;

const BLOG_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block title %}{{ page.title | default("Blog") }} - {{ site.title }}{% endblock %}

{% block content %}
<h1>{{ page.title | default("Blog") }}</h1>
{% if page.intro_markdown %}{{ page.intro_markdown | safe }}{% endif %}

{% with section = "blog" %}{% for item in items %}{% include "card.html" %}{% endfor %}{% endwith %}
{% endblock %}"##;

const BLOG_POST_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block title %}{{ item.title | default(item.slug | titleify) }} - {{ site.title }}{% endblock %}

{% block content %}
<article class="post">
  <h1>{{ item.title | default(item.slug | titleify) }}</h1>
  {% if item.date %}<time datetime="{{ item.date | date }}">{{ item.date | date("%B %-d, %Y") }}</time>{% endif %}
  {% if item.content_markdown %}<div class="content">{{ item.content_markdown | safe }}</div>{% endif %}
</article>

{% if similar %}
<aside class="similar">
  <h2>Related posts</h2>
  {% with section = "blog" %}{% for item in similar %}{% include "card.html" %}{% endfor %}{% endwith %}
</aside>
{% endif %}
{% endblock %}"##;

const TAG_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block title %}{{ tag | category }} - {{ site.title }}{% endblock %}

{% block content %}
<h1>{{ tag | category }}</h1>
<div class="grid">
{% with section = "portfolio" %}{% for item in items %}{% include "card.html" %}{% endfor %}{% endwith %}
</div>
{% endblock %}"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block title %}{{ page.title | default(name | titleify) }} - {{ site.title }}{% endblock %}

{% block content %}
<article class="page">
  <h1>{{ page.title | default(name | titleify) }}</h1>
  {% if page.content_markdown %}{{ page.content_markdown | safe }}{% endif %}
</article>
{% endblock %}"##;

const NOT_FOUND_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block title %}Not found - {{ site.title }}{% endblock %}

{% block content %}
<h1>Not found</h1>
<p>Nothing lives at <code>{{ path }}</code>.</p>
<p><a href="{{ site.base_url }}">Back home</a></p>
{% endblock %}"##;
