//! Site rendering for folio.
//!
//! Maps URL paths to templates and content, renders them with minijinja, and
//! freezes every route into a static site.

pub mod assets;
pub mod freezer;
pub mod routes;
pub mod site;
pub mod templates;

pub use freezer::{FreezeConfig, FreezeError, FreezeResult, Freezer};
pub use routes::{Route, NOT_FOUND_PATH};
pub use site::{Site, SiteConfig, SiteError, SiteMeta};
pub use templates::TemplateEngine;
