//! Follow policy: pure per-frame gating decisions.
//!
//! Two independent gates must both pass before an entity moves: the external
//! "should this object move at all" toggle and the internal "is it time to
//! move again" throttle. Both are pure functions of the configuration and an
//! injected timestamp, so they are deterministic without a live clock.

use std::time::Duration;

use crate::follow::config::{FollowConfig, Sensitivity};

/// Whether following is currently enabled for this entity (external toggle).
pub fn follow_enabled(config: &FollowConfig) -> bool {
    config.follow_enabled
}

/// Whether the throttle window has elapsed and an update is due at `now`.
///
/// The first placement is always due. `Instant` sensitivity is never
/// throttled. Otherwise the elapsed time must strictly exceed the tier's
/// minimum update interval; equality does not yet qualify.
pub fn update_due(config: &FollowConfig, now: Duration) -> bool {
    let Some(last) = config.last_update_time else {
        return true;
    };
    if config.sensitivity == Sensitivity::Instant {
        return true;
    }
    now.saturating_sub(last) > config.sensitivity.min_update_interval()
}
