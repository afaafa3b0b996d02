//! The routing table.

use std::fmt;
use std::path::PathBuf;

use folio_content::Group;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Path the not-found page is served and frozen under.
pub const NOT_FOUND_PATH: &str = "/404.html";

/// Pages that back an index route and are not served on their own.
pub const RESERVED_PAGES: [&str; 3] = ["home", "portfolio", "blog"];

/// Characters escaped in path segments: everything but RFC 3986 unreserved.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A renderable location of the site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Home,
    /// `/portfolio/`
    Portfolio,
    /// `/portfolio/<slug>/`
    PortfolioItem(String),
    /// `/blog/`
    Blog,
    /// `/blog/<slug>/`
    BlogPost(String),
    /// `/tags/<tag>/`
    Tag(String),
    /// `/<name>/`
    Page(String),
    /// `/404.html`
    NotFound,
}

impl Route {
    /// Resolve a URL path (relative to the site base) to a route.
    ///
    /// Segments are percent-decoded and trailing slashes are optional.
    /// Returns `None` for paths outside the routing table.
    pub fn parse(path: &str) -> Option<Self> {
        if path == NOT_FOUND_PATH {
            return Some(Self::NotFound);
        }

        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode_segment)
            .collect::<Option<_>>()?;

        if segments
            .iter()
            .any(|s| s.starts_with('.') || s.contains('/'))
        {
            return None;
        }

        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            [] => Some(Self::Home),
            ["portfolio"] => Some(Self::Portfolio),
            ["portfolio", slug] => Some(Self::PortfolioItem(slug.to_string())),
            ["blog"] => Some(Self::Blog),
            ["blog", slug] => Some(Self::BlogPost(slug.to_string())),
            ["tags", tag] => Some(Self::Tag(tag.to_string())),
            [name] => Some(Self::Page(name.to_string())),
            _ => None,
        }
    }

    /// Route of a single item of a group.
    pub fn item(group: Group, slug: &str) -> Self {
        match group {
            Group::Portfolio => Self::PortfolioItem(slug.to_string()),
            Group::Blog => Self::BlogPost(slug.to_string()),
        }
    }

    /// Canonical URL path, relative to the site base, percent-encoded.
    pub fn path(&self) -> String {
        match self {
            Self::NotFound => NOT_FOUND_PATH.to_string(),
            _ => {
                let mut path = String::from("/");
                for segment in self.segments() {
                    path.push_str(&encode_segment(segment));
                    path.push('/');
                }
                path
            }
        }
    }

    /// Template used to render the route.
    pub fn template(&self) -> &'static str {
        match self {
            Self::Home => "home.html",
            Self::Portfolio => "portfolio.html",
            Self::PortfolioItem(_) => "portfolio_item.html",
            Self::Blog => "blog.html",
            Self::BlogPost(_) => "blog_post.html",
            Self::Tag(_) => "tag.html",
            Self::Page(_) => "page.html",
            Self::NotFound => "404.html",
        }
    }

    /// File the route is frozen to, relative to the output directory.
    ///
    /// Directory-style paths become `<path>/index.html`, named with the
    /// decoded segments.
    pub fn output_file(&self) -> PathBuf {
        match self {
            Self::NotFound => PathBuf::from(NOT_FOUND_PATH.trim_start_matches('/')),
            _ => self
                .segments()
                .into_iter()
                .collect::<PathBuf>()
                .join("index.html"),
        }
    }

    /// Decoded path segments of a directory-style route.
    fn segments(&self) -> Vec<&str> {
        match self {
            Self::Home | Self::NotFound => vec![],
            Self::Portfolio => vec!["portfolio"],
            Self::PortfolioItem(slug) => vec!["portfolio", slug.as_str()],
            Self::Blog => vec!["blog"],
            Self::BlogPost(slug) => vec!["blog", slug.as_str()],
            Self::Tag(tag) => vec!["tags", tag.as_str()],
            Self::Page(name) => vec![name.as_str()],
        }
    }
}

/// Percent-encode a single path segment.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

fn decode_segment(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
