//! Provider seams for head-pose tracking hardware or simulators.

use std::time::Duration;

use futures::future::BoxFuture;

use crate::pose::HeadPose;

/// Run state of the underlying tracking provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderState {
    /// Provider has not been started yet
    #[default]
    NotStarted,
    /// Provider is delivering poses
    Running,
    /// Provider was stopped
    Stopped,
}

impl std::fmt::Display for ProviderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderState::NotStarted => write!(f, "Not Started"),
            ProviderState::Running => write!(f, "Running"),
            ProviderState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Outcome of a sensing permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionResponse {
    /// Consent granted; tracking may start
    Granted,
    /// Consent declined; the session attempt fails
    Denied,
}

/// Supplier of world-space head poses.
///
/// Implemented by the host over real tracking hardware or a simulator. The
/// session manager owns the start/stop lifecycle; the follow loop only calls
/// [`PoseProvider::sample`].
pub trait PoseProvider: Send + Sync {
    /// Start the provider. Resolves once poses are available or with an
    /// error if the underlying session could not be brought up.
    fn start(&self) -> BoxFuture<'_, anyhow::Result<()>>;

    /// Stop the provider. Idempotent.
    fn stop(&self);

    /// Current run state, non-blocking.
    fn state(&self) -> ProviderState;

    /// Sample the head pose at the given scene time.
    ///
    /// Returns `None` when a pose is transiently unavailable (for example
    /// during a system suspension); callers skip that frame and try again.
    fn sample(&self, at: Duration) -> Option<HeadPose>;
}

/// Gate for the host environment's sensing consent flow.
pub trait PermissionGate: Send + Sync {
    /// Whether this environment requires user consent before tracking.
    fn requires_permission(&self) -> bool;

    /// Ask the user/system for spatial sensing consent.
    ///
    /// Only called when [`PermissionGate::requires_permission`] is true.
    fn request(&self) -> BoxFuture<'_, PermissionResponse>;
}
