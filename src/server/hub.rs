// src/server/hub.rs

use std::path::PathBuf;

use tokio::sync::broadcast;
use tracing::debug;

/// Notification pushed to every connected browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadEvent {
    /// Reload the whole page.
    Full,
    /// Re-fetch the stylesheets with these file names; empty means all.
    Css(Vec<String>),
}

/// Fan-out point between tasks and connected live-reload clients.
///
/// Each client holds a broadcast receiver; only the server subscribes, so
/// the client set is owned and mutated by the server alone.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    tx: broadcast::Sender<ReloadEvent>,
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ReloadHub {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.tx.subscribe()
    }

    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn reload(&self) {
        self.send(ReloadEvent::Full);
    }

    pub fn reload_css(&self, names: Vec<String>) {
        self.send(ReloadEvent::Css(names));
    }

    /// Notify about freshly written files: CSS injection if every file is a
    /// stylesheet, a full reload otherwise. Nothing happens for an empty list.
    pub fn stream(&self, written: &[PathBuf]) {
        if written.is_empty() {
            return;
        }

        let all_css = written
            .iter()
            .all(|p| p.extension().is_some_and(|ext| ext == "css"));

        if all_css {
            let names = written
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect();
            self.reload_css(names);
        } else {
            self.reload();
        }
    }

    fn send(&self, event: ReloadEvent) {
        match self.tx.send(event) {
            Ok(clients) => debug!(clients, "live-reload event sent"),
            Err(broadcast::error::SendError(event)) => {
                debug!(?event, "no live-reload clients connected")
            }
        }
    }
}
