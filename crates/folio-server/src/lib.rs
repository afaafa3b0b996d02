//! Live web server for folio sites.
//!
//! Serves every route of the site dynamically and reloads content when files
//! under the content or templates directory change.

pub mod server;
pub mod watcher;

pub use server::{respond, ServerConfig, ServerError, WebServer};
pub use watcher::{FileWatcher, WatchEvent};
