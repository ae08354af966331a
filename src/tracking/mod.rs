//! Head-pose tracking: provider seams and session lifecycle.

pub mod provider;
pub mod session;
pub mod simulated;

pub use provider::{PermissionGate, PermissionResponse, PoseProvider, ProviderState};
pub use session::{TrackingSessionManager, TrackingSessionState};
pub use simulated::{NoPermissionGate, ScriptedPermissionGate, SimulatedPoseProvider};
