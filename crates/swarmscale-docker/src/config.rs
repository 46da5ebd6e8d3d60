//! Docker endpoint settings.
//!
//! Resolved from, in order of precedence: an explicit host override (the
//! `--host` flag), the environment (`DOCKER_HOST`, `DOCKER_API_VERSION`,
//! `DOCKER_TLS_VERIFY`), the `[docker]` section of the config file, and
//! built-in defaults.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use swarmscale_core::config::DockerSection;
use swarmscale_core::{ConfigError, parse_duration};

pub const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";
pub const DEFAULT_API_VERSION: &str = "1.41";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_TCP_PORT: u16 = 2375;

/// Where the Docker daemon listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockerHost {
    /// Local Unix domain socket.
    Unix(PathBuf),
    /// Plain-text TCP, as `host:port`.
    Tcp(String),
}

impl DockerHost {
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidHost {
            host: s.to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        if let Some(path) = s.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(invalid("missing socket path"));
            }
            return Ok(DockerHost::Unix(PathBuf::from(path)));
        }
        if s.starts_with('/') {
            return Ok(DockerHost::Unix(PathBuf::from(s)));
        }

        let addr = s
            .strip_prefix("tcp://")
            .or_else(|| s.strip_prefix("http://"));
        if let Some(addr) = addr {
            let addr = addr.trim_end_matches('/');
            if addr.is_empty() {
                return Err(invalid("missing address"));
            }
            if addr.contains('/') {
                return Err(invalid("path prefixes are not supported"));
            }
            return Ok(if has_port(addr) {
                DockerHost::Tcp(addr.to_string())
            } else {
                DockerHost::Tcp(format!("{addr}:{DEFAULT_TCP_PORT}"))
            });
        }

        if s.starts_with("https://") {
            return Err(invalid("TLS connections are not supported"));
        }
        Err(invalid("expected unix://, tcp:// or http:// scheme"))
    }

    /// Value for the HTTP `Host` header.
    pub fn authority(&self) -> &str {
        match self {
            DockerHost::Unix(_) => "localhost",
            DockerHost::Tcp(addr) => addr,
        }
    }
}

/// `host:port` or `[v6]:port`.
fn has_port(addr: &str) -> bool {
    match addr.rsplit_once(':') {
        Some((host, port)) => {
            !port.is_empty()
                && port.chars().all(|c| c.is_ascii_digit())
                && (!host.contains(':') || host.ends_with(']'))
        }
        None => false,
    }
}

impl FromStr for DockerHost {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DockerHost::parse(s)
    }
}

impl fmt::Display for DockerHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DockerHost::Unix(path) => write!(f, "unix://{}", path.display()),
            DockerHost::Tcp(addr) => write!(f, "tcp://{addr}"),
        }
    }
}

/// Fully resolved client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerConfig {
    pub host: DockerHost,
    /// Engine API version, without the leading `v`.
    pub api_version: String,
    /// Upper bound on each HTTP exchange.
    pub timeout: Duration,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            host: DockerHost::Unix(PathBuf::from("/var/run/docker.sock")),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl DockerConfig {
    /// Settings from the process environment alone.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(None, &DockerSection::default(), |key| std::env::var(key).ok())
    }

    /// Merge an explicit override, the environment, and the config file.
    ///
    /// `env` is consulted instead of the process environment directly so
    /// resolution can be tested.
    pub fn resolve(
        host_override: Option<&str>,
        file: &DockerSection,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let host_str = host_override
            .map(str::to_string)
            .or_else(|| lookup("DOCKER_HOST"))
            .or_else(|| file.host.clone())
            .unwrap_or_else(|| DEFAULT_DOCKER_HOST.to_string());
        let host = DockerHost::parse(&host_str)?;

        if matches!(host, DockerHost::Tcp(_)) && lookup("DOCKER_TLS_VERIFY").is_some() {
            return Err(ConfigError::InvalidHost {
                host: host_str,
                reason: "DOCKER_TLS_VERIFY is set but TLS connections are not supported"
                    .to_string(),
            });
        }

        let api_version = lookup("DOCKER_API_VERSION")
            .or_else(|| file.api_version.clone())
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let api_version = api_version.trim().trim_start_matches('v').to_string();

        let timeout = match file.timeout.as_deref() {
            Some(t) => parse_duration(t)?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            host,
            api_version,
            timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn parse_unix_socket() {
        assert_eq!(
            DockerHost::parse("unix:///var/run/docker.sock").unwrap(),
            DockerHost::Unix(PathBuf::from("/var/run/docker.sock"))
        );
        assert_eq!(
            DockerHost::parse("/run/user/1000/docker.sock").unwrap(),
            DockerHost::Unix(PathBuf::from("/run/user/1000/docker.sock"))
        );
    }

    #[test]
    fn parse_tcp() {
        assert_eq!(
            DockerHost::parse("tcp://10.0.0.5:2375").unwrap(),
            DockerHost::Tcp("10.0.0.5:2375".to_string())
        );
        assert_eq!(
            DockerHost::parse("http://manager:4243/").unwrap(),
            DockerHost::Tcp("manager:4243".to_string())
        );
    }

    #[test]
    fn parse_tcp_default_port() {
        assert_eq!(
            DockerHost::parse("tcp://manager").unwrap(),
            DockerHost::Tcp("manager:2375".to_string())
        );
        assert_eq!(
            DockerHost::parse("tcp://[::1]").unwrap(),
            DockerHost::Tcp("[::1]:2375".to_string())
        );
        assert_eq!(
            DockerHost::parse("tcp://[::1]:2376").unwrap(),
            DockerHost::Tcp("[::1]:2376".to_string())
        );
    }

    #[test]
    fn parse_rejects_unsupported() {
        assert!(DockerHost::parse("https://manager:2376").is_err());
        assert!(DockerHost::parse("ssh://user@manager").is_err());
        assert!(DockerHost::parse("unix://").is_err());
        assert!(DockerHost::parse("tcp://").is_err());
        assert!(DockerHost::parse("manager:2375").is_err());
    }

    #[test]
    fn display_round_trips_scheme() {
        assert_eq!(
            DockerHost::Tcp("10.0.0.5:2375".to_string()).to_string(),
            "tcp://10.0.0.5:2375"
        );
        assert_eq!(
            DockerHost::Unix(PathBuf::from("/var/run/docker.sock")).to_string(),
            "unix:///var/run/docker.sock"
        );
    }

    #[test]
    fn resolve_defaults() {
        let config = DockerConfig::resolve(None, &DockerSection::default(), env_from(&[])).unwrap();
        assert_eq!(config, DockerConfig::default());
    }

    #[test]
    fn resolve_precedence_override_env_file() {
        let file = DockerSection {
            host: Some("tcp://file:2375".to_string()),
            api_version: Some("1.40".to_string()),
            timeout: Some("5s".to_string()),
        };
        let env = env_from(&[("DOCKER_HOST", "tcp://env:2375"), ("DOCKER_API_VERSION", "v1.43")]);

        let config = DockerConfig::resolve(Some("tcp://flag:2375"), &file, &env).unwrap();
        assert_eq!(config.host, DockerHost::Tcp("flag:2375".to_string()));
        assert_eq!(config.api_version, "1.43");
        assert_eq!(config.timeout, Duration::from_secs(5));

        let config = DockerConfig::resolve(None, &file, &env).unwrap();
        assert_eq!(config.host, DockerHost::Tcp("env:2375".to_string()));

        let config = DockerConfig::resolve(None, &file, env_from(&[])).unwrap();
        assert_eq!(config.host, DockerHost::Tcp("file:2375".to_string()));
        assert_eq!(config.api_version, "1.40");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let config = DockerConfig::resolve(
            None,
            &DockerSection::default(),
            env_from(&[("DOCKER_HOST", ""), ("DOCKER_TLS_VERIFY", "")]),
        )
        .unwrap();
        assert_eq!(config.host, DockerConfig::default().host);
    }

    #[test]
    fn tls_verify_with_tcp_is_rejected() {
        let err = DockerConfig::resolve(
            None,
            &DockerSection::default(),
            env_from(&[("DOCKER_HOST", "tcp://manager:2376"), ("DOCKER_TLS_VERIFY", "1")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHost { .. }));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let file = DockerSection {
            timeout: Some("forever".to_string()),
            ..DockerSection::default()
        };
        assert!(DockerConfig::resolve(None, &file, env_from(&[])).is_err());
    }
}
