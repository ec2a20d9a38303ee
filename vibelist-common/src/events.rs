//! Event types for the vibelist event system
//!
//! Hosts subscribe to the bus to drive progress indicators; no component
//! depends on anyone listening.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// vibelist event types
///
/// Serialized with a `type` tag so hosts can forward them verbatim to a UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VibelistEvent {
    /// A new pipeline run was started (attached callers do not emit this)
    GenerationStarted {
        run_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// A pipeline run produced a playlist
    GenerationCompleted {
        run_id: Uuid,
        track_count: usize,
        generated_title: Option<String>,
        timestamp: DateTime<Utc>,
    },

    /// A pipeline run failed
    GenerationFailed {
        run_id: Uuid,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// One enhancement batch finished
    EnhancementProgress {
        /// 1-based batch number
        batch: usize,
        total_batches: usize,
        /// Songs resolved so far across all finished batches
        resolved: usize,
        timestamp: DateTime<Utc>,
    },

    /// A playlist was created in the catalog
    PlaylistExported {
        playlist_id: String,
        track_count: usize,
        missing_count: usize,
        timestamp: DateTime<Utc>,
    },
}

/// Broadcast bus for [`VibelistEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<VibelistEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// Slow subscribers lose the oldest events once `capacity` is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<VibelistEvent> {
        self.tx.subscribe()
    }

    /// Emit an event
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: VibelistEvent,
    ) -> Result<usize, broadcast::error::SendError<VibelistEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: VibelistEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
