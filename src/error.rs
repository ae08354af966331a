//! Error types for tracking sessions and follow configuration.

use thiserror::Error;

/// Errors that terminate a tracking session attempt.
///
/// Both variants are terminal for the attempt that produced them: the session
/// manager performs no automatic retry, and a new explicit `start()` is
/// required to try again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackingError {
    /// The user or system declined the required spatial sensing consent.
    #[error("spatial sensing permission denied")]
    PermissionDenied,

    /// The underlying tracking provider could not start.
    #[error("pose provider failed to start: {0}")]
    ProviderStartFailed(String),
}

/// Errors raised when validating a follow configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FollowError {
    /// Rejected at configuration time, never discovered mid-animation.
    #[error("invalid follow configuration: {0}")]
    InvalidConfiguration(String),
}
