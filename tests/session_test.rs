//! Integration tests for tracking session lifecycle and cancellation.

use std::sync::Arc;
use std::time::Duration;

use smoothfollow::tracking::{
    NoPermissionGate, PermissionResponse, ProviderState, ScriptedPermissionGate,
    SimulatedPoseProvider, TrackingSessionManager, TrackingSessionState,
};
use smoothfollow::PoseProvider;
use smoothfollow::TrackingError;

/// Route session logs through the test harness; `RUST_LOG` controls detail.
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Wait until the session settles in `Running` or `Failed`.
async fn wait_for_outcome(manager: &TrackingSessionManager) -> TrackingSessionState {
    let mut rx = manager.subscribe();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let state = rx.borrow_and_update().clone();
            if matches!(
                state,
                TrackingSessionState::Running | TrackingSessionState::Failed(_)
            ) {
                return state;
            }
            rx.changed().await.expect("state channel closed");
        }
    })
    .await
    .expect("session did not settle in time")
}

#[tokio::test]
async fn start_reaches_running_and_poses_sample() {
    init_logging();
    let provider = Arc::new(SimulatedPoseProvider::new());
    let manager = TrackingSessionManager::new(provider.clone(), Arc::new(NoPermissionGate));

    assert_eq!(manager.state(), TrackingSessionState::Idle);
    manager.start();
    assert_eq!(wait_for_outcome(&manager).await, TrackingSessionState::Running);

    assert_eq!(provider.state(), ProviderState::Running);
    let head = manager.sample_pose(Duration::from_millis(16));
    assert!(head.is_some());
    assert_eq!(head.map(|h| h.timestamp), Some(Duration::from_millis(16)));
}

#[tokio::test]
async fn permission_denial_is_terminal_for_the_attempt() {
    let provider = Arc::new(SimulatedPoseProvider::new());
    let gate = Arc::new(ScriptedPermissionGate::always(PermissionResponse::Denied));
    let manager = TrackingSessionManager::new(provider.clone(), gate);

    manager.start();
    assert_eq!(
        wait_for_outcome(&manager).await,
        TrackingSessionState::Failed(TrackingError::PermissionDenied)
    );

    // No automatic retry: the state stays Failed and the provider never ran.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        manager.state(),
        TrackingSessionState::Failed(TrackingError::PermissionDenied)
    );
    assert_eq!(provider.state(), ProviderState::NotStarted);
}

#[tokio::test]
async fn provider_start_failure_surfaces_reason() {
    let provider = Arc::new(SimulatedPoseProvider::new().with_failing_start());
    let manager = TrackingSessionManager::new(provider, Arc::new(NoPermissionGate));

    manager.start();
    match wait_for_outcome(&manager).await {
        TrackingSessionState::Failed(TrackingError::ProviderStartFailed(reason)) => {
            assert!(reason.contains("simulated"));
        }
        other => panic!("expected ProviderStartFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn superseding_start_discards_the_first_attempt() {
    init_logging();
    // First permission request stalls and is denied; the second resolves
    // immediately with a grant. Only the second attempt's outcome may ever
    // be observed.
    let provider = Arc::new(SimulatedPoseProvider::new());
    let gate = Arc::new(ScriptedPermissionGate::new([
        (Duration::from_millis(200), PermissionResponse::Denied),
        (Duration::ZERO, PermissionResponse::Granted),
    ]));
    let manager = TrackingSessionManager::new(provider, gate);

    manager.start();
    tokio::time::sleep(Duration::from_millis(20)).await;
    manager.start();

    assert_eq!(wait_for_outcome(&manager).await, TrackingSessionState::Running);

    // Long after the first attempt would have resolved, its denial must not
    // have overwritten the newer outcome.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(manager.state(), TrackingSessionState::Running);
}

#[tokio::test]
async fn cancel_leaves_prior_state_observable() {
    let provider = Arc::new(SimulatedPoseProvider::new().with_start_delay(Duration::from_millis(200)));
    let manager = TrackingSessionManager::new(provider, Arc::new(NoPermissionGate));

    manager.start();
    assert_eq!(manager.state(), TrackingSessionState::Initializing);

    manager.cancel();
    tokio::time::sleep(Duration::from_millis(300)).await;

    // The aborted attempt never publishes Running; the prior state remains.
    assert_eq!(manager.state(), TrackingSessionState::Initializing);
}

#[tokio::test]
async fn stop_returns_to_idle_and_stops_the_provider() {
    let provider = Arc::new(SimulatedPoseProvider::new());
    let manager = TrackingSessionManager::new(provider.clone(), Arc::new(NoPermissionGate));

    manager.start();
    assert_eq!(wait_for_outcome(&manager).await, TrackingSessionState::Running);

    manager.stop();
    assert_eq!(manager.state(), TrackingSessionState::Idle);
    assert_eq!(provider.state(), ProviderState::Stopped);
    assert!(manager.sample_pose(Duration::ZERO).is_none());
}

#[tokio::test]
async fn explicit_restart_after_failure_can_succeed() {
    let provider = Arc::new(SimulatedPoseProvider::new());
    let gate = Arc::new(ScriptedPermissionGate::new([
        (Duration::ZERO, PermissionResponse::Denied),
        (Duration::ZERO, PermissionResponse::Granted),
    ]));
    let manager = TrackingSessionManager::new(provider, gate);

    manager.start();
    assert_eq!(
        wait_for_outcome(&manager).await,
        TrackingSessionState::Failed(TrackingError::PermissionDenied)
    );

    manager.start();
    assert_eq!(wait_for_outcome(&manager).await, TrackingSessionState::Running);
}
