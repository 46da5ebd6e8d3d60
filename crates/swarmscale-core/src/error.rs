//! Error types for swarmscale.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for control-plane operations.
pub type ControlPlaneResult<T> = Result<T, ControlPlaneError>;

/// Failures while talking to the orchestration control plane.
///
/// A missing service is not an error; lookups report it as
/// [`LookupOutcome::NotFound`](crate::LookupOutcome::NotFound).
#[derive(Debug, Error)]
pub enum ControlPlaneError {
    #[error("failed to connect to {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },

    #[error("request error: {0}")]
    Request(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("control plane returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("cannot scale service {service}: {reason}")]
    UnsupportedMode { service: String, reason: String },
}

/// Terminal failures of a scaling run.
#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("delay cancelled; no scaling action taken")]
    Cancelled,

    /// Shutdown arrived after the delay; no request was sent after it.
    #[error("interrupted; no further control-plane requests sent")]
    Interrupted,

    #[error(transparent)]
    ControlPlane(#[from] ControlPlaneError),
}

/// Errors loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),

    #[error("invalid docker host {host:?}: {reason}")]
    InvalidHost { host: String, reason: String },
}
