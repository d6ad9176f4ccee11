// src/watch/event_handler.rs

//! Turns raw `notify` events into engine events.

use std::path::Path;

use notify::event::ModifyKind;
use notify::{Event, EventKind};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::engine::RuntimeEvent;
use crate::watch::path_utils::relative_str;
use crate::watch::subscriptions::Subscription;

/// Creates and content or name modifications count as changes. Metadata-only
/// modifications (`touch`, `chmod`), access and remove do not.
pub fn is_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    }
}

/// Names of the subscriptions interested in `rel_path`.
pub fn matching_subscriptions<'a>(subscriptions: &'a [Subscription], rel_path: &str) -> Vec<&'a str> {
    subscriptions
        .iter()
        .filter(|s| s.matches(rel_path))
        .map(Subscription::name)
        .collect()
}

/// Forward `event` to the runtime once per interested subscription and path.
///
/// Returns `false` once the runtime channel is closed.
pub async fn process_event(
    cwd: &Path,
    event: Event,
    subscriptions: &[Subscription],
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> bool {
    if !is_change(&event.kind) {
        return true;
    }

    for path in &event.paths {
        let Some(rel) = relative_str(cwd, path) else {
            warn!(?path, "could not relativize event path");
            continue;
        };

        for name in matching_subscriptions(subscriptions, &rel) {
            debug!(subscription = %name, path = %rel, "watch match");
            let sent = runtime_tx
                .send(RuntimeEvent::ChangeDetected {
                    subscription: name.to_string(),
                    path: rel.clone(),
                })
                .await;
            if sent.is_err() {
                return false;
            }
        }
    }

    true
}
