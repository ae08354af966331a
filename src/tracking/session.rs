//! Tracking session manager: asynchronous, cancellable bring-up of head-pose
//! tracking.
//!
//! The frame loop never awaits; it only reads the latest published session
//! state. Initialization (permission prompt, provider startup) runs in a
//! spawned tokio task, and a newer `start()` always supersedes an in-flight
//! attempt: the old task is aborted and an attempt-generation counter keeps a
//! stale result from ever overwriting a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::TrackingError;
use crate::pose::HeadPose;
use crate::tracking::provider::{PermissionGate, PermissionResponse, PoseProvider};

/// Observable state of the tracking session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrackingSessionState {
    /// No activation has been requested
    #[default]
    Idle,
    /// An initialization attempt is in flight
    Initializing,
    /// Tracking is up; poses may be sampled
    Running,
    /// The most recent attempt failed; no automatic retry
    Failed(TrackingError),
}

impl std::fmt::Display for TrackingSessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingSessionState::Idle => write!(f, "Idle"),
            TrackingSessionState::Initializing => write!(f, "Initializing..."),
            TrackingSessionState::Running => write!(f, "Running"),
            TrackingSessionState::Failed(e) => write!(f, "Failed: {e}"),
        }
    }
}

/// Brings up head-pose tracking exactly once per activation and makes the
/// outcome observable without blocking callers.
pub struct TrackingSessionManager {
    provider: Arc<dyn PoseProvider>,
    permissions: Arc<dyn PermissionGate>,
    /// Bumped on every start/cancel; a publish only lands if its captured
    /// generation is still current.
    generation: Arc<AtomicU64>,
    state_tx: watch::Sender<TrackingSessionState>,
    state_rx: watch::Receiver<TrackingSessionState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl TrackingSessionManager {
    /// Create a manager over the given provider and permission gate.
    pub fn new(provider: Arc<dyn PoseProvider>, permissions: Arc<dyn PermissionGate>) -> Self {
        let (state_tx, state_rx) = watch::channel(TrackingSessionState::Idle);
        Self {
            provider,
            permissions,
            generation: Arc::new(AtomicU64::new(0)),
            state_tx,
            state_rx,
            task: Mutex::new(None),
        }
    }

    /// Begin an initialization attempt.
    ///
    /// Never fails synchronously. If an attempt is already in flight (or the
    /// session is running) it is superseded: the state returns to
    /// `Initializing` and only the new attempt's outcome is ever observed.
    ///
    /// Must be called from within a tokio runtime context.
    pub fn start(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.abort_in_flight();
        self.publish(generation, TrackingSessionState::Initializing);

        tracing::info!("starting tracking session (attempt {})", generation);

        let provider = Arc::clone(&self.provider);
        let permissions = Arc::clone(&self.permissions);
        let gen_counter = Arc::clone(&self.generation);
        let state_tx = self.state_tx.clone();

        let handle = tokio::spawn(async move {
            let outcome = Self::run_attempt(provider, permissions).await;
            Self::publish_with(&state_tx, &gen_counter, generation, outcome);
        });

        *self.lock_task() = Some(handle);
    }

    /// Abort any in-flight attempt, leaving the previously published state
    /// in place.
    pub fn cancel(&self) {
        // Bump the generation so a task that already resumed past its last
        // suspension point cannot publish a stale outcome.
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.abort_in_flight();
    }

    /// Cancel any in-flight attempt, stop the provider, and return to `Idle`.
    pub fn stop(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.abort_in_flight();
        self.provider.stop();
        self.publish(generation, TrackingSessionState::Idle);
        tracing::info!("tracking session stopped");
    }

    /// Latest published session state. Non-blocking; safe to call from the
    /// frame loop every frame.
    pub fn state(&self) -> TrackingSessionState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to session state transitions, e.g. for a UI status binding.
    pub fn subscribe(&self) -> watch::Receiver<TrackingSessionState> {
        self.state_tx.subscribe()
    }

    /// Sample the head pose at the given scene time.
    pub fn sample_pose(&self, at: Duration) -> Option<HeadPose> {
        self.provider.sample(at)
    }

    /// One full initialization attempt: permission negotiation, then
    /// provider startup. Cancellation happens externally via task abort plus
    /// the generation check at publish time.
    async fn run_attempt(
        provider: Arc<dyn PoseProvider>,
        permissions: Arc<dyn PermissionGate>,
    ) -> TrackingSessionState {
        if permissions.requires_permission() {
            match permissions.request().await {
                PermissionResponse::Granted => {}
                PermissionResponse::Denied => {
                    tracing::warn!("spatial sensing permission denied");
                    return TrackingSessionState::Failed(TrackingError::PermissionDenied);
                }
            }
        }

        match provider.start().await {
            Ok(()) => {
                tracing::info!("pose provider running");
                TrackingSessionState::Running
            }
            Err(e) => {
                tracing::warn!("pose provider failed to start: {e}");
                TrackingSessionState::Failed(TrackingError::ProviderStartFailed(e.to_string()))
            }
        }
    }

    fn publish(&self, generation: u64, state: TrackingSessionState) {
        Self::publish_with(&self.state_tx, &self.generation, generation, state);
    }

    /// Publish a state for a given attempt generation. The check runs inside
    /// `send_if_modified`, which serializes against concurrent publishes, so
    /// a superseded attempt can never land its result after the supersession.
    fn publish_with(
        state_tx: &watch::Sender<TrackingSessionState>,
        gen_counter: &AtomicU64,
        generation: u64,
        state: TrackingSessionState,
    ) {
        state_tx.send_if_modified(|current| {
            if gen_counter.load(Ordering::SeqCst) != generation {
                tracing::debug!("discarding stale session state from attempt {}", generation);
                return false;
            }
            if *current == state {
                return false;
            }
            *current = state;
            true
        });
    }

    fn abort_in_flight(&self) {
        if let Some(handle) = self.lock_task().take() {
            handle.abort();
        }
    }

    fn lock_task(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.task.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TrackingSessionManager {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}
