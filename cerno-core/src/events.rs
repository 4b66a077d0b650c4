//! String-keyed event topics connecting the four pipeline stages, backed by
//! a broadcast channel per the design notes' "topic-keyed broadcast channel
//! or internal pub-sub" guidance.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Structured payload for every event topic in the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A watched file changed on disk.
    FileChanged {
        /// Path that changed.
        path: String,
    },
    /// An accumulation run finished for a path.
    AccumulationComplete {
        /// Path that was accumulated.
        path: String,
    },
    /// A reconciliation run finished.
    ReconciliationComplete,
    /// A caller requested resolution for a target file.
    ResolveRequested {
        /// Target path.
        path: String,
        /// Agent/formatter name requested, if any.
        agent: Option<String>,
        /// Whether the caller asked for a dry run.
        dry_run: bool,
    },
}

/// A bounded broadcast bus. Each stage subscribes once at startup and reacts
/// to the events relevant to it; late subscribers miss prior events, which
/// matches the pipeline's "react to new triggers" model rather than a
/// durable log.
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus {
    /// Build a bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Returns the number of
    /// receivers the event was delivered to; `0` is not an error — it means
    /// no stage is currently listening.
    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to all events published from this point forward.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}
