//! Shared types used across swarmscale crates.

use std::fmt;
use std::time::Duration;

/// Delay applied when the caller does not configure one.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(30);

/// Scheduling mode of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    /// A fixed number of interchangeable tasks.
    Replicated,
    /// One task per eligible node.
    Global,
    /// Run-to-completion tasks with a fixed concurrency.
    ReplicatedJob,
    /// One run-to-completion task per node.
    GlobalJob,
}

impl ServiceMode {
    /// Whether the replica count of a service in this mode can be set.
    pub fn is_scalable(self) -> bool {
        self == ServiceMode::Replicated
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceMode::Replicated => "replicated",
            ServiceMode::Global => "global",
            ServiceMode::ReplicatedJob => "replicated-job",
            ServiceMode::GlobalJob => "global-job",
        }
    }
}

impl fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a service as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceState {
    /// Control-plane identifier.
    pub id: String,
    /// Unique service name.
    pub name: String,
    /// Object version, used for optimistic updates.
    pub version: u64,
    pub mode: ServiceMode,
    /// Desired replica count in replicated mode. Zero when the service
    /// carries no replicated-mode replica count.
    pub current_replicas: u64,
}

/// Result of looking a service up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(ServiceState),
    NotFound,
}

/// A single scaling invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalingRequest {
    pub service_name: String,
    /// Signed change to the replica count.
    pub delta: i64,
    /// Time to wait before touching the control plane.
    pub delay: Duration,
}

impl ScalingRequest {
    pub fn new(service_name: impl Into<String>, delta: i64) -> Self {
        Self {
            service_name: service_name.into(),
            delta,
            delay: DEFAULT_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Terminal state of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleOutcome {
    /// The update was acknowledged by the control plane.
    Scaled { service: String, from: u64, to: u64 },
    /// No service with the requested name exists.
    NotFound { service: String },
}

impl fmt::Display for ScaleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleOutcome::Scaled { service, from, to } => {
                write!(f, "Scaled service '{service}' from {from} to {to} replicas")
            }
            ScaleOutcome::NotFound { service } => write!(f, "Service {service} not found!"),
        }
    }
}
