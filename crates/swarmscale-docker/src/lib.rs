//! swarmscale-docker — Docker Swarm as a scaling control plane.
//!
//! [`DockerClient`] speaks the Docker Engine HTTP API over the daemon's
//! Unix socket or a plain TCP endpoint and implements
//! [`swarmscale_core::ControlPlane`].
//!
//! ## Endpoint resolution
//!
//! ```text
//! --host flag  >  DOCKER_HOST  >  [docker].host in swarmscale.toml  >  unix:///var/run/docker.sock
//! ```

pub mod client;
pub mod config;
pub mod models;
mod transport;

pub use client::DockerClient;
pub use config::{DockerConfig, DockerHost};
