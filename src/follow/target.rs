//! Target pose geometry.
//!
//! Pure functions that project the follow offset into world space and derive
//! an orientation that faces the head from the projected point.

use glam::{Mat3, Quat, Vec3};

use crate::follow::config::FollowConfig;
use crate::pose::Pose;

/// Squared length below which a cross product is treated as degenerate
/// rather than normalized.
const DEGENERATE_LENGTH_SQ: f32 = 1e-8;

/// World position the followed object should move to.
///
/// Rotates the head-local offset direction into world space by the head's
/// orientation, re-normalizes it to guard against drift from the applied
/// rotation, and offsets by the configured distance from the head position.
pub fn target_position(head: &Pose, config: &FollowConfig) -> Vec3 {
    let world_direction = (head.orientation * config.direction).normalize();
    head.position + world_direction * config.distance
}

/// Orientation that faces the head from `target`.
///
/// The object's forward axis (+Z) points from the target toward the head; the
/// basis is completed with the world up vector. When the view direction is
/// (near-)parallel to world up the cross product degenerates, and the
/// `fallback` orientation (typically the entity's previous one) is returned
/// instead of normalizing a near-zero vector.
pub fn target_orientation(target: Vec3, head_position: Vec3, fallback: Quat) -> Quat {
    let to_head = head_position - target;
    if to_head.length_squared() < DEGENERATE_LENGTH_SQ {
        return fallback;
    }
    let forward = to_head.normalize();

    let right = Vec3::Y.cross(forward);
    if right.length_squared() < DEGENERATE_LENGTH_SQ {
        // Target directly above or below the head.
        return fallback;
    }
    let right = right.normalize();
    let up = forward.cross(right);

    Quat::from_mat3(&Mat3::from_cols(right, up, forward))
}
