//! swarmscale.toml configuration parser.
//!
//! ```toml
//! [docker]
//! host = "unix:///var/run/docker.sock"
//! api_version = "1.41"
//! timeout = "60s"
//!
//! [scaling]
//! default_delay = "30s"
//! ```
//!
//! Every field is optional. Environment variables and command-line flags
//! take precedence over values read from the file.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwarmscaleConfig {
    pub docker: Option<DockerSection>,
    pub scaling: Option<ScalingSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DockerSection {
    /// Daemon endpoint, e.g. `unix:///var/run/docker.sock` or `tcp://10.0.0.5:2375`.
    pub host: Option<String>,
    pub api_version: Option<String>,
    /// Per-request timeout, e.g. `"60s"`.
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScalingSection {
    /// Delay used when none is given on the command line, e.g. `"30s"`.
    pub default_delay: Option<String>,
}

impl SwarmscaleConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Default delay from the `[scaling]` section, if set.
    pub fn default_delay(&self) -> Result<Option<Duration>, ConfigError> {
        self.scaling
            .as_ref()
            .and_then(|s| s.default_delay.as_deref())
            .map(parse_duration)
            .transpose()
    }
}

/// Parse a duration string like "30s", "500ms", "5m". A bare number is
/// read as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let trimmed = s.trim();
    let invalid = || ConfigError::InvalidDuration(s.to_string());

    let parsed = if let Some(ms) = trimmed.strip_suffix("ms") {
        ms.parse::<u64>().ok().map(Duration::from_millis)
    } else if let Some(secs) = trimmed.strip_suffix('s') {
        secs.parse::<u64>().ok().map(Duration::from_secs)
    } else if let Some(mins) = trimmed.strip_suffix('m') {
        mins.parse::<u64>()
            .ok()
            .and_then(|m| m.checked_mul(60))
            .map(Duration::from_secs)
    } else {
        trimmed.parse::<u64>().ok().map(Duration::from_secs)
    };

    parsed.ok_or_else(invalid)
}
