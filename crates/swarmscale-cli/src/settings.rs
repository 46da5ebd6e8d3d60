//! Effective settings for one run, merged from flags, environment, and
//! the optional config file.

use std::time::Duration;

use anyhow::Context;

use swarmscale_core::{DEFAULT_DELAY, ScalingRequest, SwarmscaleConfig};
use swarmscale_docker::DockerConfig;

use crate::Cli;

#[derive(Debug)]
pub(crate) struct Settings {
    pub request: ScalingRequest,
    pub docker: DockerConfig,
}

impl Settings {
    pub fn resolve(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => SwarmscaleConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SwarmscaleConfig::default(),
        };

        let delay = match cli.delay {
            Some(secs) => Duration::from_secs(secs),
            None => file
                .default_delay()
                .context("invalid [scaling] default_delay")?
                .unwrap_or(DEFAULT_DELAY),
        };

        let docker_section = file.docker.clone().unwrap_or_default();
        let docker = DockerConfig::resolve(cli.host.as_deref(), &docker_section, env)
            .context("resolving docker endpoint")?;

        Ok(Self {
            request: ScalingRequest::new(cli.service_name.clone(), cli.delta).with_delay(delay),
            docker,
        })
    }
}
