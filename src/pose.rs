//! Rigid transform types shared across the crate.

use std::time::Duration;

use glam::{Quat, Vec3};

/// A rigid transform (position + orientation) in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Position in world space
    pub position: Vec3,
    /// Orientation in world space
    pub orientation: Quat,
}

impl Pose {
    /// Identity pose at the world origin.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Create a pose from a position and orientation.
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Create a pose at a position with identity orientation.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// Interpolate between two poses.
    ///
    /// Translation is linearly interpolated, orientation spherically. `t` is
    /// clamped to `[0, 1]`. Hosts without their own animation engine can use
    /// this to evaluate an issued transition command.
    pub fn lerp(&self, other: &Pose, t: f32) -> Pose {
        let t = t.clamp(0.0, 1.0);
        Pose {
            position: self.position.lerp(other.position, t),
            orientation: self.orientation.slerp(other.orientation, t),
        }
    }

    /// The local +Z axis of this pose expressed in world space.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A head pose sampled from the tracking provider at a specific timestamp.
///
/// Read-only snapshot; the sampling call confers no ownership of the
/// underlying tracking data.
#[derive(Debug, Clone, Copy)]
pub struct HeadPose {
    /// The sampled rigid transform in world space
    pub pose: Pose,
    /// Scene time at which the sample was taken
    pub timestamp: Duration,
}
