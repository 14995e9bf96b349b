use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};

use crate::error::WatchError;

/// Something that can tell the sorter the watched directories changed.
pub trait ChangeSource {
    /// Blocks until the next relevant change.
    fn wait(&mut self) -> Result<(), WatchError>;

    /// Discards changes that piled up since the last `wait`.
    fn drain(&mut self) {}
}

/// Recursive filesystem watcher over a set of directories.
pub struct NotifyWatcher {
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<Event>>,
}

impl NotifyWatcher {
    pub fn new(dirs: &[PathBuf]) -> Result<NotifyWatcher, WatchError> {
        let (tx, events) = channel();
        let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
        for dir in dirs {
            log::debug!("watching {}", dir.display());
            watcher.watch(dir, RecursiveMode::Recursive)?;
        }
        Ok(NotifyWatcher {
            _watcher: watcher,
            events,
        })
    }
}

fn is_change(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

impl ChangeSource for NotifyWatcher {
    fn wait(&mut self) -> Result<(), WatchError> {
        loop {
            let event = self.events.recv().map_err(|_| WatchError::Disconnected)??;
            if is_change(&event) {
                log::debug!("change: {:?} {:?}", event.kind, event.paths);
                return Ok(());
            }
        }
    }

    fn drain(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(Err(e)) => log::warn!("watcher: {e}"),
                Ok(Ok(_)) => {}
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return,
            }
        }
    }
}
