//! swarmscale — scale a Docker Swarm service after a delay.
//!
//! ```text
//! swarmscale cs208_api-server-normal 1 --delay 30
//! swarmscale web -2 --delay 0 --host tcp://manager:2375
//! ```

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tokio::sync::watch;
use tracing::info;

use swarmscale_core::{ScaleController, SleepDelay};
use swarmscale_docker::DockerClient;

mod settings;

use settings::Settings;

#[derive(Debug, Parser)]
#[command(
    name = "swarmscale",
    about = "Scale a Docker Swarm service after a delay",
    version
)]
pub(crate) struct Cli {
    /// Name (or ID) of the Docker service
    pub service_name: String,

    /// Change in replica count (positive to scale up, negative to scale down)
    #[arg(allow_negative_numbers = true)]
    pub delta: i64,

    /// Delay in seconds before scaling [default: 30]
    #[arg(long, value_name = "SECONDS")]
    pub delay: Option<u64>,

    /// Docker daemon endpoint (overrides DOCKER_HOST)
    #[arg(long, value_name = "URL")]
    pub host: Option<String>,

    /// Path to a swarmscale.toml config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<std::path::PathBuf>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let settings = Settings::resolve(&cli, |key| std::env::var(key).ok())?;
    info!(
        service = %settings.request.service_name,
        delta = settings.request.delta,
        delay_secs = settings.request.delay.as_secs_f64(),
        host = %settings.docker.host,
        "scaling request"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received");
            let _ = shutdown_tx.send(true);
        }
    });

    let client = DockerClient::new(settings.docker);
    let controller = ScaleController::new(client, SleepDelay::new());

    let outcome = controller
        .run_until_shutdown(&settings.request, shutdown_rx)
        .await
        .with_context(|| format!("failed to scale service {}", settings.request.service_name))?;

    println!("{outcome}");
    Ok(())
}

/// Used when `RUST_LOG` is unset: our crates at `info`, dependencies at `warn`.
const DEFAULT_LOG_FILTER: &str = "warn,swarmscale=info,swarmscale_core=info,swarmscale_docker=info";

/// Logs go to stderr; stdout carries only the status line.
fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
