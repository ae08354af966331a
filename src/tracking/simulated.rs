//! Simulated tracking provider and permission gates.
//!
//! Usable both by this crate's tests and by hosts that want to exercise
//! follow behavior without tracking hardware.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;

use crate::pose::{HeadPose, Pose};
use crate::tracking::provider::{
    PermissionGate, PermissionResponse, PoseProvider, ProviderState,
};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A pose provider driven by host-set poses instead of hardware.
pub struct SimulatedPoseProvider {
    state: Mutex<ProviderState>,
    head_pose: Mutex<Option<Pose>>,
    start_delay: Duration,
    fail_start: bool,
}

impl SimulatedPoseProvider {
    /// A provider that starts immediately and reports the identity pose.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ProviderState::NotStarted),
            head_pose: Mutex::new(Some(Pose::IDENTITY)),
            start_delay: Duration::ZERO,
            fail_start: false,
        }
    }

    /// Delay startup, e.g. to exercise cancellation while initializing.
    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Make every startup attempt fail.
    pub fn with_failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    /// Set the pose reported by subsequent samples; `None` makes sampling
    /// transiently unavailable.
    pub fn set_head_pose(&self, pose: Option<Pose>) {
        *lock(&self.head_pose) = pose;
    }
}

impl Default for SimulatedPoseProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseProvider for SimulatedPoseProvider {
    fn start(&self) -> BoxFuture<'_, anyhow::Result<()>> {
        Box::pin(async move {
            if !self.start_delay.is_zero() {
                tokio::time::sleep(self.start_delay).await;
            }
            if self.fail_start {
                anyhow::bail!("simulated provider start failure");
            }
            *lock(&self.state) = ProviderState::Running;
            Ok(())
        })
    }

    fn stop(&self) {
        *lock(&self.state) = ProviderState::Stopped;
    }

    fn state(&self) -> ProviderState {
        *lock(&self.state)
    }

    fn sample(&self, at: Duration) -> Option<HeadPose> {
        if *lock(&self.state) != ProviderState::Running {
            return None;
        }
        let pose = *lock(&self.head_pose);
        pose.map(|pose| HeadPose {
            pose,
            timestamp: at,
        })
    }
}

/// A permission gate for environments that require no consent.
pub struct NoPermissionGate;

impl PermissionGate for NoPermissionGate {
    fn requires_permission(&self) -> bool {
        false
    }

    fn request(&self) -> BoxFuture<'_, PermissionResponse> {
        Box::pin(async { PermissionResponse::Granted })
    }
}

/// A permission gate that replays scripted responses, each after an optional
/// delay. Once the script is exhausted, further requests resolve immediately
/// with the fallback response.
pub struct ScriptedPermissionGate {
    script: Mutex<VecDeque<(Duration, PermissionResponse)>>,
    fallback: PermissionResponse,
}

impl ScriptedPermissionGate {
    pub fn new(script: impl IntoIterator<Item = (Duration, PermissionResponse)>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback: PermissionResponse::Granted,
        }
    }

    /// A gate that always responds immediately with the given answer.
    pub fn always(response: PermissionResponse) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: response,
        }
    }
}

impl PermissionGate for ScriptedPermissionGate {
    fn requires_permission(&self) -> bool {
        true
    }

    fn request(&self) -> BoxFuture<'_, PermissionResponse> {
        let next = lock(&self.script).pop_front();
        let fallback = self.fallback;
        Box::pin(async move {
            match next {
                Some((delay, response)) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    response
                }
                None => fallback,
            }
        })
    }
}
