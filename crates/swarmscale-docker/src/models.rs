//! Docker Engine API response types (minimal subset).
//!
//! The service `Spec` is kept as raw JSON: the update endpoint replaces the
//! whole spec, so every field we do not understand must be sent back as-is.

use serde::Deserialize;
use serde_json::{Value, json};

use swarmscale_core::{ServiceMode, ServiceState};

/// A Swarm service returned by `GET /services/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwarmService {
    #[serde(rename = "ID")]
    pub id: String,
    pub version: ObjectVersion,
    #[serde(default)]
    pub spec: Value,
}

/// Swarm object version used for optimistic concurrency.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectVersion {
    pub index: u64,
}

/// Body of a successful `POST /services/{id}/update`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceUpdateResponse {
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

/// Error body returned by the Engine API on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl SwarmService {
    pub fn name(&self) -> Option<&str> {
        self.spec.get("Name").and_then(Value::as_str)
    }

    /// Scheduling mode from `Spec.Mode`. Defaults to replicated, as the
    /// Engine does for a spec without a mode.
    pub fn mode(&self) -> ServiceMode {
        let Some(mode) = self.spec.get("Mode").and_then(Value::as_object) else {
            return ServiceMode::Replicated;
        };
        if mode.contains_key("Global") {
            ServiceMode::Global
        } else if mode.contains_key("GlobalJob") {
            ServiceMode::GlobalJob
        } else if mode.contains_key("ReplicatedJob") {
            ServiceMode::ReplicatedJob
        } else {
            ServiceMode::Replicated
        }
    }

    /// `Spec.Mode.Replicated.Replicas`, or zero when any part is absent.
    pub fn replicas(&self) -> u64 {
        self.spec
            .pointer("/Mode/Replicated/Replicas")
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }

    /// Copy of the spec with its mode set to `replicas` replicated tasks.
    pub fn spec_with_replicas(&self, replicas: u64) -> Value {
        let mut spec = match &self.spec {
            Value::Object(_) => self.spec.clone(),
            _ => json!({}),
        };
        spec["Mode"] = json!({ "Replicated": { "Replicas": replicas } });
        spec
    }

    pub fn to_state(&self, requested_name: &str) -> ServiceState {
        ServiceState {
            id: self.id.clone(),
            name: self.name().unwrap_or(requested_name).to_string(),
            version: self.version.index,
            mode: self.mode(),
            current_replicas: self.replicas(),
        }
    }
}
