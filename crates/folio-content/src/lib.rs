//! Content loading for folio sites.
//!
//! Content lives in a directory of YAML files: static pages under `pages/`,
//! and numbered portfolio and blog entries under `portfolio/` and `blog/`.
//! Fields whose name ends in `_markdown` are rendered to HTML on load.

pub mod loader;
pub mod markdown;
pub mod taxonomy;
pub mod text;

pub use loader::{
    get_content, get_items, get_page, list_pages, read_yaml, Content, ContentError, Group, Item,
    DRAFT_FIELD, NUM_SEPARATOR, PORTFOLIO_MAIN_MULTIPLE, RESERVED_FIELDS,
};
pub use markdown::{render_markdown, transform_markdown, MARKDOWN_SUFFIX};
pub use taxonomy::{extract_tags, similar_items, taxonomy_filter, TAGS_FIELD};
