//! The control-plane capability consumed by the controller.

use std::future::Future;
use std::pin::Pin;

use crate::error::ControlPlaneResult;
use crate::types::LookupOutcome;

/// Boxed, sendable future returned by injected capabilities.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Narrow view of an orchestration control plane — injected for testability.
pub trait ControlPlane: Send + Sync {
    /// Look up a service by name.
    ///
    /// A missing service yields `Ok(LookupOutcome::NotFound)`; only
    /// communication failures are errors.
    fn get_service<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ControlPlaneResult<LookupOutcome>>;

    /// Set the replicated-mode replica count of a service.
    ///
    /// Completes once the control plane acknowledges the update; the live
    /// task set converges afterwards.
    fn set_service_replicas<'a>(
        &'a self,
        name: &'a str,
        replicas: u64,
    ) -> BoxFuture<'a, ControlPlaneResult<()>>;
}
