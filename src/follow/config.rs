//! Per-entity follow configuration.

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::FollowError;

/// Squared length below which a direction vector is rejected as degenerate.
const MIN_DIRECTION_LENGTH_SQ: f32 = 1e-8;

/// How eagerly a followed object chases the head.
///
/// Each tier fixes two derived constants: the throttle window between
/// accepted updates and the duration of each repositioning transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    /// Reposition rarely, glide slowly
    Low,
    /// Balanced default
    #[default]
    Medium,
    /// Track closely with short transitions
    High,
    /// No throttling; snap within a single frame
    Instant,
}

impl Sensitivity {
    /// Minimum elapsed time between two accepted updates.
    pub fn min_update_interval(&self) -> Duration {
        match self {
            Sensitivity::Low => Duration::from_millis(1500),
            Sensitivity::Medium => Duration::from_millis(500),
            Sensitivity::High => Duration::from_millis(100),
            Sensitivity::Instant => Duration::ZERO,
        }
    }

    /// Length of the eased transition toward the new target.
    ///
    /// `Instant` nominally returns zero; the motion driver substitutes the
    /// current frame delta so the snap still completes within one frame.
    pub fn transition_duration(&self) -> Duration {
        match self {
            Sensitivity::Low => Duration::from_millis(1000),
            Sensitivity::Medium => Duration::from_millis(600),
            Sensitivity::High => Duration::from_millis(300),
            Sensitivity::Instant => Duration::ZERO,
        }
    }
}

impl std::fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sensitivity::Low => write!(f, "Low"),
            Sensitivity::Medium => write!(f, "Medium"),
            Sensitivity::High => write!(f, "High"),
            Sensitivity::Instant => write!(f, "Instant"),
        }
    }
}

/// Configuration attached to a followable entity.
///
/// Immutable after construction except for `follow_enabled` (toggled by the
/// host) and `last_update_time` (written only by the follow system).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowConfig {
    /// Offset length along `direction`, in meters
    pub distance: f32,
    /// Unit-length offset direction in head-local space (forward = -Z)
    pub direction: Vec3,
    /// Update pacing and transition length
    pub sensitivity: Sensitivity,
    /// External toggle; when false the object holds its position
    pub follow_enabled: bool,
    /// Scene time of the last committed update; `None` until first placement.
    /// Monotonically non-decreasing, written only by the follow system.
    #[serde(skip)]
    pub last_update_time: Option<Duration>,
}

impl FollowConfig {
    /// Create a validated configuration.
    ///
    /// Rejects a non-positive distance and a (near-)zero direction vector;
    /// the direction is normalized on the way in. Validation happens here so
    /// a bad configuration never reaches the per-frame path.
    pub fn new(
        distance: f32,
        direction: Vec3,
        sensitivity: Sensitivity,
    ) -> Result<Self, FollowError> {
        if !distance.is_finite() || distance <= 0.0 {
            return Err(FollowError::InvalidConfiguration(format!(
                "distance must be positive and finite, got {distance}"
            )));
        }
        if !direction.is_finite() || direction.length_squared() < MIN_DIRECTION_LENGTH_SQ {
            return Err(FollowError::InvalidConfiguration(format!(
                "direction must be a non-zero vector, got {direction}"
            )));
        }

        Ok(Self {
            distance,
            direction: direction.normalize(),
            sensitivity,
            follow_enabled: true,
            last_update_time: None,
        })
    }

    /// Configuration placing the object straight ahead of the head.
    pub fn in_front(distance: f32, sensitivity: Sensitivity) -> Result<Self, FollowError> {
        Self::new(distance, Vec3::NEG_Z, sensitivity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_normalizes_direction() {
        let config = FollowConfig::new(1.0, Vec3::new(0.0, 0.0, -3.0), Sensitivity::Medium)
            .expect("config should be valid");

        assert!((config.direction.length() - 1.0).abs() < 1e-6);
        assert!(config.follow_enabled);
        assert!(config.last_update_time.is_none());
    }

    #[test]
    fn zero_direction_is_rejected() {
        let result = FollowConfig::new(1.0, Vec3::ZERO, Sensitivity::Medium);
        assert!(matches!(
            result,
            Err(FollowError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn non_positive_distance_is_rejected() {
        assert!(FollowConfig::new(0.0, Vec3::NEG_Z, Sensitivity::Low).is_err());
        assert!(FollowConfig::new(-0.5, Vec3::NEG_Z, Sensitivity::Low).is_err());
        assert!(FollowConfig::new(f32::NAN, Vec3::NEG_Z, Sensitivity::Low).is_err());
    }

    #[test]
    fn instant_tier_has_no_throttle_window() {
        assert_eq!(Sensitivity::Instant.min_update_interval(), Duration::ZERO);
        assert_eq!(Sensitivity::Instant.transition_duration(), Duration::ZERO);
    }

    #[test]
    fn tiers_order_from_low_to_high() {
        assert!(
            Sensitivity::Low.min_update_interval() > Sensitivity::Medium.min_update_interval()
        );
        assert!(
            Sensitivity::Medium.min_update_interval() > Sensitivity::High.min_update_interval()
        );
    }
}
