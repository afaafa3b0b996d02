//! Live web server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    handler::HandlerWithoutStateExt,
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use tokio::sync::RwLock;
use tower_http::services::ServeDir;

use folio_site::assets::{AssetPipeline, DEFAULT_CSS_FILE};
use folio_site::{Route, Site, SiteConfig, SiteError};

use crate::watcher::{FileWatcher, WatchEvent};

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Site to serve
    pub site: SiteConfig,

    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Open browser on start
    pub open: bool,

    /// Reload the site when content or templates change
    pub watch: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            host: "127.0.0.1".to_string(),
            port: 5000,
            open: true,
            watch: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Site(#[from] SiteError),

    #[error("File watch error: {0}")]
    WatchError(String),
}

type SharedSite = Arc<RwLock<Site>>;

/// Web server rendering the site on every request.
pub struct WebServer {
    config: ServerConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Load the site and serve it until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let site = Site::load(self.config.site.clone())?;
        let base_url = site.config().meta.base_url.clone();
        let state: SharedSite = Arc::new(RwLock::new(site));

        if self.config.watch {
            self.spawn_watcher(Arc::clone(&state))?;
        }

        let app = router(state, &base_url, &self.config.site);

        let url = format!("http://{}{}", addr, base_url);
        tracing::info!("Serving site at {}", url);

        if self.config.open {
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }

    /// Reload the site whenever content or templates change.
    fn spawn_watcher(&self, state: SharedSite) -> Result<(), ServerError> {
        let site_config = self.config.site.clone();

        let mut watch_paths = vec![site_config.content_dir.clone()];
        watch_paths.extend(site_config.templates_dir.clone());

        let (watcher, mut rx) =
            FileWatcher::new(&watch_paths).map_err(|e| ServerError::WatchError(e.to_string()))?;

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&state, &site_config, event).await;
            }
            drop(watcher);
        });

        Ok(())
    }
}

/// Build the router for a loaded site.
fn router(state: SharedSite, base_url: &str, config: &SiteConfig) -> Router {
    let static_files =
        ServeDir::new(&config.static_dir).fallback(static_fallback.into_service());

    Router::new()
        .nest_service(&format!("{}static", base_url), static_files)
        .fallback(page_handler)
        .with_state(state)
}

async fn handle_watch_event(state: &SharedSite, config: &SiteConfig, event: WatchEvent) {
    if !event.needs_reload() {
        tracing::debug!("Ignoring change to {}", event.path().display());
        return;
    }

    tracing::info!("Changed: {}", event.path().display());

    let config = config.clone();
    let loaded = tokio::task::spawn_blocking(move || Site::load(config)).await;

    match loaded {
        Ok(Ok(site)) => *state.write().await = site,
        Ok(Err(e)) => tracing::warn!("Keeping previous site, reload failed: {}", e),
        Err(e) => tracing::error!("Reload task failed: {}", e),
    }
}

async fn page_handler(State(state): State<SharedSite>, uri: Uri) -> impl IntoResponse {
    let site = state.read().await;
    respond(&site, uri.path())
}

/// Static files missing from the static directory; only the built-in
/// stylesheet is served from here.
async fn static_fallback(uri: Uri) -> Response {
    if uri.path().trim_start_matches('/') == DEFAULT_CSS_FILE {
        ([(header::CONTENT_TYPE, "text/css")], AssetPipeline::default_css()).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Render the page for a request path.
///
/// The path includes the site's base URL. Paths outside the base or the
/// routing table get the not-found page with a 404 status.
pub fn respond(site: &Site, path: &str) -> (StatusCode, Html<String>) {
    let base = site.config().meta.base_url.trim_end_matches('/');

    let route = path
        .strip_prefix(base)
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .and_then(|rest| Route::parse(if rest.is_empty() { "/" } else { rest }));

    let result = match &route {
        Some(Route::NotFound) | None => Err(SiteError::NotFound(path.to_string())),
        Some(route) => site.render(route),
    };

    match result {
        Ok(html) => (StatusCode::OK, Html(html)),
        Err(SiteError::NotFound(_)) => {
            tracing::debug!("Not found: {}", path);
            not_found(site, path)
        }
        Err(e) => {
            tracing::error!("Failed to render {}: {}", path, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!(
                    "<h1>Internal server error</h1><pre>{}</pre>",
                    escape_html(&e.to_string())
                )),
            )
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn not_found(site: &Site, path: &str) -> (StatusCode, Html<String>) {
    match site.render_not_found(path) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)),
        Err(e) => {
            tracing::error!("Failed to render not-found page: {}", e);
            (StatusCode::NOT_FOUND, Html("<h1>Not found</h1>".to_string()))
        }
    }
}
