//! File watching for content reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Quiet period closing a burst of file system events.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// Events emitted by the file watcher.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// A YAML content file was created or modified
    ContentChanged(PathBuf),

    /// A template was created or modified
    TemplateChanged(PathBuf),

    /// A file was deleted
    Removed(PathBuf),

    /// Any other change
    Other(PathBuf),
}

impl WatchEvent {
    /// Whether the site must be reloaded to reflect this change.
    pub fn needs_reload(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::ContentChanged(p) | Self::TemplateChanged(p) | Self::Removed(p) | Self::Other(p) => {
                p
            }
        }
    }
}

/// File watcher for detecting changes.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Create a new file watcher for the given paths.
    ///
    /// Paths that do not exist are skipped. Returns the watcher and a channel
    /// to receive events.
    pub fn new(
        paths: &[PathBuf],
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        std::thread::spawn(move || {
            // Editors write in bursts; wait for a quiet period, then send
            // one event for the whole burst.
            while let Ok(first) = sync_rx.recv() {
                let mut burst = vec![first];
                let mut disconnected = false;

                loop {
                    match sync_rx.recv_timeout(DEBOUNCE) {
                        Ok(event) => burst.push(event),
                        Err(mpsc::RecvTimeoutError::Timeout) => break,
                        Err(mpsc::RecvTimeoutError::Disconnected) => {
                            disconnected = true;
                            break;
                        }
                    }
                }

                let events = burst
                    .iter()
                    .flat_map(|event| {
                        event
                            .paths
                            .iter()
                            .filter_map(|path| classify_event(path, &event.kind))
                    })
                    .collect();

                if let Some(event) = summarize(events) {
                    if async_tx.blocking_send(event).is_err() {
                        break;
                    }
                }

                if disconnected {
                    break;
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Collapse a burst into one event: the first change that needs a reload,
/// otherwise the last change seen.
fn summarize(events: Vec<WatchEvent>) -> Option<WatchEvent> {
    match events.iter().position(WatchEvent::needs_reload) {
        Some(index) => events.into_iter().nth(index),
        None => events.into_iter().last(),
    }
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match kind {
        EventKind::Remove(_) => Some(WatchEvent::Removed(path.to_path_buf())),
        EventKind::Create(_) | EventKind::Modify(_) => {
            if ext == "yaml" || ext == "yml" {
                Some(WatchEvent::ContentChanged(path.to_path_buf()))
            } else if ext == "html" || ext == "jinja" || ext == "j2" {
                Some(WatchEvent::TemplateChanged(path.to_path_buf()))
            } else {
                Some(WatchEvent::Other(path.to_path_buf()))
            }
        }
        _ => None,
    }
}
