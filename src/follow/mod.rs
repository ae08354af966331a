//! Damping follow behavior: policy, geometry, motion, and the frame loop.

pub mod config;
pub mod motion;
pub mod policy;
pub mod system;
pub mod target;

pub use config::{FollowConfig, Sensitivity};
pub use motion::{AnimationSink, Easing, MotionDriver};
pub use system::{EntityId, FollowEntity, FollowSystem, FrameContext};
pub use target::{target_orientation, target_position};
