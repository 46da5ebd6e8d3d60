//! HTTP/1.1 exchange with the Docker daemon over a Unix socket or TCP.
//!
//! Every request opens a fresh connection; a run makes at most three
//! requests, so there is nothing to pool.

use std::time::Duration;

use bytes::Bytes;
use http::{Method, Request, StatusCode, header};
use http_body_util::{BodyExt, Full};
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

use swarmscale_core::{ControlPlaneError, ControlPlaneResult};

use crate::config::DockerHost;

const USER_AGENT: &str = concat!("swarmscale/", env!("CARGO_PKG_VERSION"));

/// Status and collected body of a daemon response.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

#[derive(Debug, Clone)]
pub(crate) struct Transport {
    host: DockerHost,
    timeout: Duration,
}

impl Transport {
    pub fn new(host: DockerHost, timeout: Duration) -> Self {
        Self { host, timeout }
    }

    pub fn host(&self) -> &DockerHost {
        &self.host
    }

    /// Send one request and collect the full response, bounded by the
    /// configured timeout.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        json_body: Option<Vec<u8>>,
    ) -> ControlPlaneResult<RawResponse> {
        let mut builder = Request::builder()
            .method(method.clone())
            .uri(path)
            .header(header::HOST, self.host.authority())
            .header(header::USER_AGENT, USER_AGENT);
        if json_body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        let req = builder
            .body(Full::new(Bytes::from(json_body.unwrap_or_default())))
            .map_err(|e| ControlPlaneError::Request(format!("build {method} {path}: {e}")))?;

        debug!(%method, %path, host = %self.host, "docker request");

        tokio::time::timeout(self.timeout, self.dispatch(req))
            .await
            .map_err(|_| ControlPlaneError::Timeout(self.timeout))?
    }

    async fn dispatch(&self, req: Request<Full<Bytes>>) -> ControlPlaneResult<RawResponse> {
        match &self.host {
            DockerHost::Tcp(addr) => {
                let stream = TcpStream::connect(addr.as_str())
                    .await
                    .map_err(|e| self.connect_error(e))?;
                exchange(stream, req).await
            }
            DockerHost::Unix(path) => self.dispatch_unix(path, req).await,
        }
    }

    #[cfg(unix)]
    async fn dispatch_unix(
        &self,
        path: &std::path::Path,
        req: Request<Full<Bytes>>,
    ) -> ControlPlaneResult<RawResponse> {
        let stream = tokio::net::UnixStream::connect(path)
            .await
            .map_err(|e| self.connect_error(e))?;
        exchange(stream, req).await
    }

    #[cfg(not(unix))]
    async fn dispatch_unix(
        &self,
        _path: &std::path::Path,
        _req: Request<Full<Bytes>>,
    ) -> ControlPlaneResult<RawResponse> {
        Err(ControlPlaneError::Connect {
            endpoint: self.host.to_string(),
            reason: "Unix sockets are not supported on this platform; use tcp://".to_string(),
        })
    }

    fn connect_error(&self, e: std::io::Error) -> ControlPlaneError {
        ControlPlaneError::Connect {
            endpoint: self.host.to_string(),
            reason: e.to_string(),
        }
    }
}

async fn exchange<S>(stream: S, req: Request<Full<Bytes>>) -> ControlPlaneResult<RawResponse>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let io = TokioIo::new(stream);
    let (mut sender, conn) = http1::handshake::<_, Full<Bytes>>(io)
        .await
        .map_err(|e| ControlPlaneError::Request(format!("handshake: {e}")))?;

    // Drive the connection in the background.
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!(error = %e, "docker connection closed with error");
        }
    });

    let resp = sender
        .send_request(req)
        .await
        .map_err(|e| ControlPlaneError::Request(format!("send: {e}")))?;
    let status = resp.status();

    let body = resp
        .into_body()
        .collect()
        .await
        .map_err(|e| ControlPlaneError::Request(format!("read body: {e}")))?
        .to_bytes();

    Ok(RawResponse { status, body })
}
