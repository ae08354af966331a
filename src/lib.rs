//! SmoothFollow - Damping Follow for Head-Tracked Scenes
//!
//! Keeps a tracked object (e.g. a floating panel) smoothly positioned in
//! front of a moving viewpoint without per-frame jitter or abrupt snapping.
//! The host runtime drives the library explicitly: `activate()` starts the
//! asynchronous tracking session bring-up, and a per-frame `update()` call
//! throttles, computes target poses, and issues eased transition commands
//! against the host's animation engine.

pub mod error;
pub mod follow;
pub mod pose;
pub mod tracking;

// Re-export commonly used types
pub use error::{FollowError, TrackingError};
pub use follow::{
    AnimationSink, Easing, EntityId, FollowConfig, FollowEntity, FollowSystem, FrameContext,
    MotionDriver, Sensitivity,
};
pub use pose::{HeadPose, Pose};
pub use tracking::{
    PermissionGate, PermissionResponse, PoseProvider, ProviderState, TrackingSessionManager,
    TrackingSessionState,
};
