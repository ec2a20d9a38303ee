//! Single-flight request coordinator
//!
//! At most one pipeline run is in flight per coordinator. Callers arriving
//! while a run is in flight attach to it and receive the same outcome. The run
//! itself is spawned, so it settles even when every caller has gone away.
//!
//! State machine: `Idle → InFlight` on invoke, `InFlight → Idle` on settle.
//! The observable [`Phase`] additionally reports `Completed` once at least one
//! run has settled and nothing is in flight.

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use uuid::Uuid;
use vibelist_common::events::{EventBus, VibelistEvent};
use vibelist_common::{Error, PlaylistRequest, PlaylistResponse, Result};

use crate::pipeline::PlaylistGenerator;

type SharedRun = Shared<BoxFuture<'static, Result<PlaylistResponse>>>;

enum RunState {
    Idle,
    InFlight { run_id: Uuid, run: SharedRun },
}

/// Observable coordinator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    InFlight,
    Completed,
}

/// Snapshot published on every transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorStatus {
    pub phase: Phase,
    pub is_loading: bool,
    /// Failure of the most recently settled run; cleared when a new run starts
    pub last_error: Option<Error>,
}

impl Default for CoordinatorStatus {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            is_loading: false,
            last_error: None,
        }
    }
}

pub struct RequestCoordinator {
    generator: Arc<dyn PlaylistGenerator>,
    state: Arc<Mutex<RunState>>,
    status: Arc<watch::Sender<CoordinatorStatus>>,
    events: Option<EventBus>,
}

impl RequestCoordinator {
    pub fn new(generator: Arc<dyn PlaylistGenerator>) -> Self {
        let (status, _) = watch::channel(CoordinatorStatus::default());
        Self {
            generator,
            state: Arc::new(Mutex::new(RunState::Idle)),
            status: Arc::new(status),
            events: None,
        }
    }

    /// Emit lifecycle events on `bus`
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Run the pipeline, or attach to the run already in flight
    ///
    /// An attached caller's own `request` is ignored: it receives the outcome
    /// of the run it joined.
    pub async fn generate_playlist(&self, request: PlaylistRequest) -> Result<PlaylistResponse> {
        let run = self.attach_or_start(request)?;
        run.await
    }

    pub fn is_loading(&self) -> bool {
        self.status.borrow().is_loading
    }

    pub fn last_error(&self) -> Option<Error> {
        self.status.borrow().last_error.clone()
    }

    pub fn phase(&self) -> Phase {
        self.status.borrow().phase
    }

    /// Watch status transitions
    pub fn subscribe(&self) -> watch::Receiver<CoordinatorStatus> {
        self.status.subscribe()
    }

    fn attach_or_start(&self, request: PlaylistRequest) -> Result<SharedRun> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| Error::Internal("coordinator state lock poisoned".to_string()))?;

        if let RunState::InFlight { run_id, run } = &*state {
            tracing::debug!(run_id = %run_id, "Attaching to in-flight generation");
            return Ok(run.clone());
        }

        let run_id = Uuid::new_v4();
        tracing::info!(run_id = %run_id, "Starting generation run");
        self.status.send_modify(|status| {
            status.phase = Phase::InFlight;
            status.is_loading = true;
            status.last_error = None;
        });
        if let Some(bus) = &self.events {
            bus.emit_lossy(VibelistEvent::GenerationStarted {
                run_id,
                timestamp: Utc::now(),
            });
        }

        let generator = Arc::clone(&self.generator);
        let slot = Arc::clone(&self.state);
        let status = Arc::clone(&self.status);
        let events = self.events.clone();

        let handle = tokio::spawn(async move {
            let result = AssertUnwindSafe(generator.generate(&request))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(Error::Internal("generation task panicked".to_string())));
            settle(&slot, &status, events.as_ref(), run_id, &result);
            result
        });

        let run = async move {
            handle
                .await
                .unwrap_or_else(|e| Err(Error::Internal(format!("generation task failed: {}", e))))
        }
        .boxed()
        .shared();

        *state = RunState::InFlight {
            run_id,
            run: run.clone(),
        };
        Ok(run)
    }
}

/// Return to `Idle` and publish the outcome of `run_id`
fn settle(
    slot: &Mutex<RunState>,
    status: &watch::Sender<CoordinatorStatus>,
    events: Option<&EventBus>,
    run_id: Uuid,
    result: &Result<PlaylistResponse>,
) {
    // Status is published under the state lock: the next run's InFlight
    // status must never be overwritten by this settle
    let mut state = match slot.lock() {
        Ok(state) => state,
        Err(poisoned) => {
            tracing::error!(run_id = %run_id, "Coordinator state lock poisoned, resetting");
            let mut state = poisoned.into_inner();
            *state = RunState::Idle;
            state
        }
    };
    if matches!(&*state, RunState::InFlight { run_id: current, .. } if *current == run_id) {
        *state = RunState::Idle;
    }
    status.send_modify(|s| {
        s.phase = Phase::Completed;
        s.is_loading = false;
        s.last_error = result.as_ref().err().cloned();
    });
    drop(state);

    match result {
        Ok(response) => {
            tracing::info!(
                run_id = %run_id,
                tracks = response.playlist.len(),
                "Generation run completed"
            );
            if let Some(bus) = events {
                bus.emit_lossy(VibelistEvent::GenerationCompleted {
                    run_id,
                    track_count: response.playlist.len(),
                    generated_title: response.generated_title.clone(),
                    timestamp: Utc::now(),
                });
            }
        }
        Err(e) => {
            tracing::warn!(run_id = %run_id, error = %e, "Generation run failed");
            if let Some(bus) = events {
                bus.emit_lossy(VibelistEvent::GenerationFailed {
                    run_id,
                    message: e.user_message(),
                    timestamp: Utc::now(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_status() {
        let status = CoordinatorStatus::default();
        assert_eq!(status.phase, Phase::Idle);
        assert!(!status.is_loading);
        assert!(status.last_error.is_none());
    }
}
