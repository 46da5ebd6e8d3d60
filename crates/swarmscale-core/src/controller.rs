//! Scale controller — delay, look up, compute, update.
//!
//! Runs the whole transition for one `ScalingRequest`. The control plane is
//! touched only after the delay gate reports that the full delay elapsed,
//! and the update is issued exactly once, with no retry.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::control_plane::ControlPlane;
use crate::delay::{DelayGate, DelayOutcome};
use crate::error::ScaleError;
use crate::replicas::compute_target;
use crate::types::{LookupOutcome, ScaleOutcome, ScalingRequest};

/// Applies a single delayed replica change to a service.
pub struct ScaleController<C, D> {
    control_plane: C,
    delay: D,
}

impl<C: ControlPlane, D: DelayGate> ScaleController<C, D> {
    /// Create a controller over an injected control plane and delay gate.
    pub fn new(control_plane: C, delay: D) -> Self {
        Self {
            control_plane,
            delay,
        }
    }

    /// Run the request to a terminal state.
    ///
    /// A missing service ends the run with `ScaleOutcome::NotFound` and no
    /// update. Control-plane failures propagate unchanged.
    pub async fn run(&self, request: &ScalingRequest) -> Result<ScaleOutcome, ScaleError> {
        let service = request.service_name.as_str();

        if !request.delay.is_zero() {
            info!(
                service = %service,
                delay_secs = request.delay.as_secs_f64(),
                "waiting before scaling"
            );
        }
        if self.delay.wait(request.delay).await == DelayOutcome::Cancelled {
            warn!(service = %service, "delay cancelled before scaling");
            return Err(ScaleError::Cancelled);
        }

        let state = match self.control_plane.get_service(service).await? {
            LookupOutcome::Found(state) => state,
            LookupOutcome::NotFound => {
                warn!(service = %service, "service not found");
                return Ok(ScaleOutcome::NotFound {
                    service: service.to_string(),
                });
            }
        };
        debug!(
            service = %service,
            id = %state.id,
            mode = %state.mode,
            replicas = state.current_replicas,
            "service looked up"
        );

        let target = compute_target(state.current_replicas, request.delta);
        info!(
            service = %service,
            from = state.current_replicas,
            to = target,
            delta = request.delta,
            "scaling service"
        );

        self.control_plane
            .set_service_replicas(service, target)
            .await?;

        Ok(ScaleOutcome::Scaled {
            service: service.to_string(),
            from: state.current_replicas,
            to: target,
        })
    }

    /// Like [`run`](Self::run), but abandons the run as soon as `shutdown`
    /// flips to `true`, whichever step it is in.
    ///
    /// The signal is checked before the run is polled, so once it is seen
    /// no further control-plane request is started. A request already on
    /// the wire is dropped without waiting for its response.
    pub async fn run_until_shutdown(
        &self,
        request: &ScalingRequest,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<ScaleOutcome, ScaleError> {
        tokio::select! {
            biased;
            _ = shutdown_signalled(&mut shutdown) => {
                warn!(service = %request.service_name, "run interrupted by shutdown signal");
                Err(ScaleError::Interrupted)
            }
            result = self.run(request) => result,
        }
    }
}

/// Resolves once the flag reads `true`. Never resolves if the sender is
/// dropped first.
async fn shutdown_signalled(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
