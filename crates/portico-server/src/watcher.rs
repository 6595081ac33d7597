//! File watching for live reload.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

/// Events emitted by the site watcher.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// `portico.toml` was modified; the config must be reloaded
    ConfigChanged(PathBuf),

    /// Markdown page was modified
    ContentChanged(PathBuf),

    /// Stylesheet was modified
    StyleChanged(PathBuf),

    /// File was created
    Created(PathBuf),

    /// File was deleted
    Deleted(PathBuf),

    /// Generic modification (static assets, sidebar file)
    Modified(PathBuf),
}

/// Watches the project tree for changes that require a rebuild.
pub struct SiteWatcher {
    _watcher: RecommendedWatcher,
}

impl SiteWatcher {
    /// Create a new watcher for the given paths.
    ///
    /// Returns the watcher and a channel to receive events.
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
                let mode = if path.is_dir() {
                    RecursiveMode::Recursive
                } else {
                    RecursiveMode::NonRecursive
                };
                watcher.watch(path, mode).map_err(std::io::Error::other)?;
            }
        }

        // Bridge thread: notify's callback is synchronous, the server side
        // is async. Editors save with write-then-rename bursts; the burst
        // collapses to its trailing event so the rebuild sees the final file.
        let async_tx_clone = async_tx.clone();
        std::thread::spawn(move || {
            let quiet = Duration::from_millis(100);

            while let Ok(event) = sync_rx.recv() {
                let event = coalesce(&sync_rx, event, quiet);

                for path in event.paths {
                    if let Some(e) = classify_event(&path, &event.kind) {
                        let _ = async_tx_clone.blocking_send(e);
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Drain a burst of events, keeping the trailing one. Returns once the
/// channel has been quiet for the given duration.
fn coalesce(
    rx: &mpsc::Receiver<notify::Event>,
    first: notify::Event,
    quiet: Duration,
) -> notify::Event {
    let mut last = first;
    while let Ok(next) = rx.recv_timeout(quiet) {
        last = next;
    }
    last
}

/// Classify a notify event into a WatchEvent.
fn classify_event(path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
    use notify::EventKind;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");

    match kind {
        EventKind::Create(_) => Some(WatchEvent::Created(path.to_path_buf())),
        EventKind::Remove(_) => Some(WatchEvent::Deleted(path.to_path_buf())),
        EventKind::Modify(_) => {
            if name == "portico.toml" {
                Some(WatchEvent::ConfigChanged(path.to_path_buf()))
            } else if ext == "md" {
                Some(WatchEvent::ContentChanged(path.to_path_buf()))
            } else if ext == "css" {
                Some(WatchEvent::StyleChanged(path.to_path_buf()))
            } else {
                Some(WatchEvent::Modified(path.to_path_buf()))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn watches_file_changes() {
        let temp = tempdir().unwrap();
        let test_file = temp.path().join("intro.md");

        // Create the watcher first (so it catches file creation)
        let (watcher, mut rx) = SiteWatcher::new(&[temp.path().to_path_buf()]).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(&test_file, "# Created").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for file watch event");
        assert!(event.unwrap().is_some(), "channel should not be closed");
    }

    #[test]
    fn bursts_collapse_to_the_trailing_event() {
        use notify::event::{DataChange, EventKind, ModifyKind, RenameMode};

        let (tx, rx) = mpsc::channel();

        let first = notify::Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
            .add_path(PathBuf::from("/site/docs/.intro.md.swp"));
        tx.send(
            notify::Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
                .add_path(PathBuf::from("/site/docs/.intro.md.swp")),
        )
        .unwrap();
        tx.send(
            notify::Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::To)))
                .add_path(PathBuf::from("/site/docs/intro.md")),
        )
        .unwrap();

        let last = coalesce(&rx, first, Duration::from_millis(10));

        assert_eq!(last.paths, vec![PathBuf::from("/site/docs/intro.md")]);
    }

    #[test]
    fn classifies_by_filename_and_extension() {
        use notify::event::{DataChange, EventKind, ModifyKind};

        let kind = EventKind::Modify(ModifyKind::Data(DataChange::Content));

        assert!(matches!(
            classify_event(Path::new("/site/portico.toml"), &kind),
            Some(WatchEvent::ConfigChanged(_))
        ));
        assert!(matches!(
            classify_event(Path::new("/site/docs/intro.md"), &kind),
            Some(WatchEvent::ContentChanged(_))
        ));
        assert!(matches!(
            classify_event(Path::new("/site/css/custom.css"), &kind),
            Some(WatchEvent::StyleChanged(_))
        ));
        assert!(matches!(
            classify_event(Path::new("/site/static/img/logo.svg"), &kind),
            Some(WatchEvent::Modified(_))
        ));
    }
}
