//! Docker Engine client for Swarm services.
//!
//! Implements [`ControlPlane`] with two Engine API calls:
//!
//! - `GET /v{api}/services/{name}` — 404 means the service does not exist.
//! - `POST /v{api}/services/{id}/update?version={index}` — replaces the
//!   service spec. The current spec is fetched first so the update carries
//!   every unrelated field unchanged and the version index the daemon
//!   expects.
//!
//! Names and IDs are percent-encoded as a single path segment, so `?`, `#`,
//! `/` or spaces in a name can never address a different resource.

use http::{Method, StatusCode};
use tracing::{debug, warn};

use swarmscale_core::{
    BoxFuture, ConfigError, ControlPlane, ControlPlaneError, ControlPlaneResult, LookupOutcome,
};

use crate::config::{DockerConfig, DockerHost};
use crate::models::{ErrorResponse, ServiceUpdateResponse, SwarmService};
use crate::transport::{RawResponse, Transport};

/// Talks to one Docker daemon.
#[derive(Debug, Clone)]
pub struct DockerClient {
    transport: Transport,
    api_version: String,
}

impl DockerClient {
    pub fn new(config: DockerConfig) -> Self {
        Self {
            transport: Transport::new(config.host, config.timeout),
            api_version: config.api_version,
        }
    }

    /// Build a client from `DOCKER_HOST` and friends.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(DockerConfig::from_env()?))
    }

    pub fn host(&self) -> &DockerHost {
        self.transport.host()
    }

    fn api_path(&self, path: &str) -> String {
        format!("/v{}{}", self.api_version, path)
    }

    fn service_path(&self, key: &str) -> String {
        self.api_path(&format!("/services/{}", urlencoding::encode(key)))
    }

    /// Fetch a service by name or ID. `Ok(None)` when the daemon reports
    /// 404.
    pub async fn inspect_service(&self, name: &str) -> ControlPlaneResult<Option<SwarmService>> {
        let path = self.service_path(name);
        let resp = self.transport.send(Method::GET, &path, None).await?;

        if resp.status == StatusCode::NOT_FOUND {
            debug!(service = %name, "docker reports no such service");
            return Ok(None);
        }
        let resp = ensure_success(resp)?;

        serde_json::from_slice::<SwarmService>(&resp.body)
            .map(Some)
            .map_err(|e| ControlPlaneError::Decode(format!("service {name}: {e}")))
    }

    /// Replace a service's spec at the given version.
    pub async fn update_service(
        &self,
        id: &str,
        version: u64,
        spec: &serde_json::Value,
    ) -> ControlPlaneResult<ServiceUpdateResponse> {
        let path = format!("{}/update?version={version}", self.service_path(id));
        let body = serde_json::to_vec(spec)
            .map_err(|e| ControlPlaneError::Request(format!("encode spec: {e}")))?;
        let resp = ensure_success(self.transport.send(Method::POST, &path, Some(body)).await?)?;

        if resp.body.is_empty() {
            return Ok(ServiceUpdateResponse::default());
        }
        serde_json::from_slice(&resp.body)
            .map_err(|e| ControlPlaneError::Decode(format!("update response for {id}: {e}")))
    }

    async fn scale(&self, name: &str, replicas: u64) -> ControlPlaneResult<()> {
        let service = self
            .inspect_service(name)
            .await?
            .ok_or_else(|| ControlPlaneError::Api {
                status: StatusCode::NOT_FOUND.as_u16(),
                message: format!("service {name} not found"),
            })?;

        let mode = service.mode();
        if !mode.is_scalable() {
            return Err(ControlPlaneError::UnsupportedMode {
                service: name.to_string(),
                reason: format!("{mode} services have no replica count"),
            });
        }

        let spec = service.spec_with_replicas(replicas);
        let resp = self
            .update_service(&service.id, service.version.index, &spec)
            .await?;

        for warning in resp.warnings.unwrap_or_default() {
            warn!(service = %name, %warning, "docker update warning");
        }
        debug!(service = %name, replicas, version = service.version.index, "service updated");
        Ok(())
    }
}

impl ControlPlane for DockerClient {
    fn get_service<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ControlPlaneResult<LookupOutcome>> {
        Box::pin(async move {
            Ok(match self.inspect_service(name).await? {
                Some(service) => LookupOutcome::Found(service.to_state(name)),
                None => LookupOutcome::NotFound,
            })
        })
    }

    fn set_service_replicas<'a>(
        &'a self,
        name: &'a str,
        replicas: u64,
    ) -> BoxFuture<'a, ControlPlaneResult<()>> {
        Box::pin(self.scale(name, replicas))
    }
}

/// Turn a non-2xx response into `ControlPlaneError::Api`, preferring the
/// daemon's `{"message": ...}` text.
fn ensure_success(resp: RawResponse) -> ControlPlaneResult<RawResponse> {
    if resp.status.is_success() {
        return Ok(resp);
    }
    let message = serde_json::from_slice::<ErrorResponse>(&resp.body)
        .map(|e| e.message)
        .unwrap_or_else(|_| {
            let text = String::from_utf8_lossy(&resp.body).trim().to_string();
            if text.is_empty() {
                resp.status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            } else {
                text
            }
        });
    Err(ControlPlaneError::Api {
        status: resp.status.as_u16(),
        message,
    })
}
