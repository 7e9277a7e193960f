use std::ffi::OsString;
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Editors tend to emit several events per save; they are coalesced over this window.
pub const DEBOUNCE: Duration = Duration::from_millis(50);

/// Keeps the OS watcher alive and exposes change notifications for one file.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    changes: Receiver<()>,
}

impl ConfigWatcher {
    /// Watches the parent directory of `path` so atomic-rename saves are seen.
    pub fn new(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|name| name.to_os_string())
            .ok_or_else(|| anyhow!("config path {} has no file name", path.display()))?;
        let directory = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let (tx, rx) = unbounded();
        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| forward_event(result, &file_name, &tx),
            Config::default(),
        )
        .context("failed to initialise config watcher")?;
        watcher
            .watch(directory, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", directory.display()))?;
        tracing::debug!(path = %path.display(), "watching config file");

        Ok(Self {
            _watcher: watcher,
            changes: rx,
        })
    }

    /// Blocks until the file changes; returns `false` once the watcher is gone.
    pub fn wait_for_change(&self) -> bool {
        if self.changes.recv().is_err() {
            return false;
        }
        thread::sleep(DEBOUNCE);
        drain(&self.changes);
        true
    }
}

fn forward_event(result: notify::Result<Event>, file_name: &OsString, tx: &Sender<()>) {
    match result {
        Ok(event) if is_relevant(&event, file_name) => {
            let _ = tx.send(());
        }
        Ok(_) => {}
        Err(err) => tracing::warn!(error = %err, "config watcher error"),
    }
}

fn is_relevant(event: &Event, file_name: &OsString) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name.as_os_str()))
}

fn drain(rx: &Receiver<()>) -> usize {
    let mut drained = 0;
    while rx.try_recv().is_ok() {
        drained += 1;
    }
    drained
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use std::path::PathBuf;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn only_modifications_of_the_target_file_count() {
        let name = OsString::from("ring.toml");
        assert!(is_relevant(
            &event(EventKind::Modify(ModifyKind::Any), "/cfg/ring.toml"),
            &name
        ));
        assert!(is_relevant(
            &event(EventKind::Create(CreateKind::File), "/cfg/ring.toml"),
            &name
        ));
        assert!(!is_relevant(
            &event(EventKind::Modify(ModifyKind::Any), "/cfg/other.toml"),
            &name
        ));
        assert!(!is_relevant(
            &event(EventKind::Access(AccessKind::Any), "/cfg/ring.toml"),
            &name
        ));
    }

    #[test]
    fn forwards_relevant_events_and_drains_bursts() {
        let name = OsString::from("ring.toml");
        let (tx, rx) = unbounded();
        for _ in 0..3 {
            forward_event(
                Ok(event(EventKind::Modify(ModifyKind::Any), "ring.toml")),
                &name,
                &tx,
            );
        }
        forward_event(
            Ok(event(EventKind::Modify(ModifyKind::Any), "x.toml")),
            &name,
            &tx,
        );
        assert_eq!(drain(&rx), 3);
        assert_eq!(drain(&rx), 0);
    }
}
