//! File system watcher with debouncing for the development loop.
//!
//! Watches each session's source roots and feeds filtered change events
//! through a channel. Debouncing keeps editor save bursts from triggering a
//! rebuild per write.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::Result;

/// File change event type.
#[derive(Debug, Clone)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// The path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// Recursive watcher over a set of source roots.
///
/// Events outside the roots, in hidden directories, or under `node_modules`
/// are dropped before they reach the channel.
pub struct FileWatcher {
    // Kept alive for the duration of the watch; dropping it stops events.
    _watcher: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl FileWatcher {
    /// Create a watcher over `roots` with a debounce window of
    /// `debounce_ms` milliseconds per path.
    pub fn new(roots: Vec<PathBuf>, debounce_ms: u64) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let (tx, rx) = mpsc::channel(100);

        let debounce = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;
        let filter_roots = roots.clone();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let Ok(event) = res else { return };
            for path in &event.paths {
                if Self::should_ignore(path, &filter_roots) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                let _ = tx.blocking_send(change);
            }
        })?;

        for root in &roots {
            watcher.watch(root, RecursiveMode::Recursive)?;
        }

        Ok((
            Self {
                _watcher: watcher,
                roots,
            },
            rx,
        ))
    }

    /// The roots being watched.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn should_ignore(path: &Path, roots: &[PathBuf]) -> bool {
        let Some(rel) = roots.iter().find_map(|root| path.strip_prefix(root).ok()) else {
            // Outside every watched root.
            return true;
        };

        for component in rel.components() {
            let Some(name) = component.as_os_str().to_str() else {
                return true;
            };
            if name == "node_modules" {
                return true;
            }
            // Hidden files and directories, including the scratch dir.
            if name.starts_with('.') && name != "." && name != ".." {
                return true;
            }
        }

        false
    }
}
