//! Motion driver: turns a computed target pose into a bounded, eased
//! transition command against the host's animation engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::follow::config::Sensitivity;
use crate::follow::system::EntityId;
use crate::pose::Pose;

/// Interpolation curve for a repositioning transition.
///
/// Ease-in and ease-in-out are deliberately not offered; they are unreliable
/// on at least one target runtime. Linear is the supported fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Fast start, decelerating toward the endpoint
    #[default]
    EaseOut,
    /// Constant-rate interpolation
    Linear,
}

impl Easing {
    /// Evaluate the curve at normalized time `t`, clamped to `[0, 1]`.
    ///
    /// Provided so a host without its own animation engine can evaluate an
    /// issued command; the crate itself never runs per-frame interpolation.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::Linear => t,
        }
    }
}

/// Host-implemented executor of transition commands.
///
/// Commands are fire-and-forget: the sink must not block the frame loop and
/// reports no per-frame progress back.
pub trait AnimationSink {
    /// Move `entity` from `from` to `to` over `duration` with the given
    /// easing curve.
    fn animate(&mut self, entity: EntityId, from: Pose, to: Pose, duration: Duration, easing: Easing);
}

/// Issues transition commands, selecting duration by sensitivity.
#[derive(Debug, Clone, Default)]
pub struct MotionDriver {
    easing: Easing,
}

impl MotionDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_easing(easing: Easing) -> Self {
        Self { easing }
    }

    /// Issue one transition command.
    ///
    /// The source is always the entity's live current pose, so a command
    /// issued mid-transition redirects smoothly from wherever the object is.
    /// `Instant` sensitivity substitutes the current frame delta for the
    /// nominal zero duration, producing a same-frame snap without a
    /// zero-length discontinuity in the interpolation engine.
    pub fn drive(
        &self,
        sink: &mut dyn AnimationSink,
        entity: EntityId,
        current: Pose,
        target: Pose,
        sensitivity: Sensitivity,
        frame_delta: Duration,
    ) {
        let duration = if sensitivity == Sensitivity::Instant {
            frame_delta
        } else {
            sensitivity.transition_duration()
        };
        sink.animate(entity, current, target, duration, self.easing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    struct Recorded {
        entity: EntityId,
        from: Pose,
        to: Pose,
        duration: Duration,
        easing: Easing,
    }

    #[derive(Default)]
    struct RecordingSink {
        commands: Vec<Recorded>,
    }

    impl AnimationSink for RecordingSink {
        fn animate(
            &mut self,
            entity: EntityId,
            from: Pose,
            to: Pose,
            duration: Duration,
            easing: Easing,
        ) {
            self.commands.push(Recorded {
                entity,
                from,
                to,
                duration,
                easing,
            });
        }
    }

    #[test]
    fn easing_hits_both_endpoints() {
        for easing in [Easing::EaseOut, Easing::Linear] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(-0.5), 0.0);
            assert_eq!(easing.apply(1.5), 1.0);
        }
    }

    #[test]
    fn ease_out_leads_linear() {
        // Fast start: ease-out is ahead of linear mid-curve.
        assert!(Easing::EaseOut.apply(0.3) > Easing::Linear.apply(0.3));
    }

    #[test]
    fn duration_comes_from_sensitivity() {
        let driver = MotionDriver::new();
        let mut sink = RecordingSink::default();

        driver.drive(
            &mut sink,
            EntityId(1),
            Pose::IDENTITY,
            Pose::at(Vec3::X),
            Sensitivity::Low,
            Duration::from_millis(16),
        );

        let cmd = &sink.commands[0];
        assert_eq!(cmd.duration, Sensitivity::Low.transition_duration());
        assert_eq!(cmd.easing, Easing::EaseOut);
    }

    #[test]
    fn instant_snaps_within_one_frame() {
        let driver = MotionDriver::new();
        let mut sink = RecordingSink::default();
        let frame_delta = Duration::from_millis(11);

        driver.drive(
            &mut sink,
            EntityId(7),
            Pose::IDENTITY,
            Pose::at(Vec3::Y),
            Sensitivity::Instant,
            frame_delta,
        );

        let cmd = &sink.commands[0];
        assert_eq!(cmd.entity, EntityId(7));
        assert_eq!(cmd.duration, frame_delta);
        assert!(cmd.duration > Duration::ZERO);
    }

    #[test]
    fn no_op_transition_ends_where_it_started() {
        let pose = Pose::at(Vec3::new(1.0, 2.0, 3.0));
        let driver = MotionDriver::new();
        let mut sink = RecordingSink::default();

        driver.drive(
            &mut sink,
            EntityId(2),
            pose,
            pose,
            Sensitivity::Medium,
            Duration::from_millis(16),
        );

        let cmd = &sink.commands[0];
        let end = cmd.from.lerp(&cmd.to, cmd.easing.apply(1.0));
        assert!((end.position - pose.position).length() < 1e-6);
        assert!(end.orientation.dot(pose.orientation).abs() > 1.0 - 1e-6);
    }
}
