//! Per-frame follow orchestration.
//!
//! The host calls [`FollowSystem::update`] once per rendered frame. The call
//! never blocks and never awaits; session initialization runs elsewhere and
//! is only observed here through its latest published state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::follow::config::FollowConfig;
use crate::follow::motion::{AnimationSink, MotionDriver};
use crate::follow::{policy, target};
use crate::pose::Pose;
use crate::tracking::session::{TrackingSessionManager, TrackingSessionState};

/// Opaque handle identifying an entity in the host's scene runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// A followable entity as presented by the host each frame.
///
/// The host owns the storage; the follow system reads `pose` as the
/// animation source and writes only `config.last_update_time`.
#[derive(Debug, Clone)]
pub struct FollowEntity {
    /// Handle into the host's scene runtime
    pub id: EntityId,
    /// The entity's live current transform
    pub pose: Pose,
    /// Follow behavior configuration
    pub config: FollowConfig,
}

impl FollowEntity {
    pub fn new(id: EntityId, pose: Pose, config: FollowConfig) -> Self {
        Self { id, pose, config }
    }
}

/// Timing for one rendered frame, supplied by the host.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Scene time at the start of this frame
    pub now: Duration,
    /// Elapsed time since the previous frame
    pub delta: Duration,
}

impl FrameContext {
    pub fn new(now: Duration, delta: Duration) -> Self {
        Self { now, delta }
    }
}

/// Drives follow updates for every followable entity, once per frame.
pub struct FollowSystem {
    session: TrackingSessionManager,
    driver: MotionDriver,
    active: bool,
}

impl FollowSystem {
    /// Create a system over the given tracking session manager with the
    /// default ease-out motion driver.
    pub fn new(session: TrackingSessionManager) -> Self {
        Self::with_driver(session, MotionDriver::new())
    }

    pub fn with_driver(session: TrackingSessionManager, driver: MotionDriver) -> Self {
        Self {
            session,
            driver,
            active: false,
        }
    }

    /// The underlying session manager, e.g. to subscribe to state changes.
    pub fn session(&self) -> &TrackingSessionManager {
        &self.session
    }

    /// Lifecycle hook: begin tracking. Must be called from within a tokio
    /// runtime context.
    pub fn activate(&mut self) {
        self.active = true;
        self.session.start();
    }

    /// Lifecycle hook: cancel any in-flight initialization, stop the
    /// provider, and suspend per-frame processing until the next activation.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.session.stop();
    }

    /// Process one frame.
    ///
    /// Skips everything unless the session is `Running`. For each entity,
    /// both policy gates must pass; then the head pose is sampled, the
    /// target pose computed, `last_update_time` committed, and a transition
    /// command issued. A failure for one entity never aborts the rest of the
    /// frame. Entities are processed in slice order.
    pub fn update(
        &mut self,
        frame: &FrameContext,
        entities: &mut [FollowEntity],
        sink: &mut dyn AnimationSink,
    ) {
        if !self.active {
            return;
        }
        if self.session.state() != TrackingSessionState::Running {
            return;
        }

        for entity in entities.iter_mut() {
            if !policy::follow_enabled(&entity.config) {
                continue;
            }
            if !policy::update_due(&entity.config, frame.now) {
                continue;
            }

            let Some(head) = self.session.sample_pose(frame.now) else {
                tracing::warn!(entity = %entity.id, "head pose unavailable, skipping");
                continue;
            };

            let position = target::target_position(&head.pose, &entity.config);
            let orientation =
                target::target_orientation(position, head.pose.position, entity.pose.orientation);

            // Committed before the animation is issued so a slow or failed
            // transition cannot re-trigger a duplicate command next frame.
            entity.config.last_update_time = Some(frame.now);

            self.driver.drive(
                sink,
                entity.id,
                entity.pose,
                Pose::new(position, orientation),
                entity.config.sensitivity,
                frame.delta,
            );
        }
    }
}
