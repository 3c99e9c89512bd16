//! User analytics dashboard — loads the user export and serves the
//! revenue, acquisition, geography, and churn charts over HTTP.

use anyhow::Context;
use clap::Parser;
use dashboard_api::ApiServer;
use dashboard_core::config::AppConfig;
use dashboard_core::load_dataset;
use dashboard_reporting::DashboardState;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "user-dashboard")]
#[command(about = "Single-page user analytics dashboard")]
#[command(version)]
struct Cli {
    /// CSV file with one row per user (overrides config)
    #[arg(long, env = "USER_DASHBOARD__DATA__PATH")]
    data: Option<String>,

    /// Bind address (overrides config)
    #[arg(long, env = "USER_DASHBOARD__API__HOST")]
    host: Option<String>,

    /// HTTP port (overrides config)
    #[arg(long, env = "USER_DASHBOARD__API__PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "user_dashboard=info,dashboard_core=info,dashboard_reporting=info,\
                 dashboard_api=info,tower_http=info"
                    .into()
            }),
        )
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    if let Some(data) = cli.data {
        config.data.path = data;
    }
    if let Some(host) = cli.host {
        config.api.host = host;
    }
    if let Some(port) = cli.port {
        config.api.port = port;
    }

    info!(
        data = %config.data.path,
        host = %config.api.host,
        port = config.api.port,
        "Configuration loaded"
    );

    // The page is never served without its data.
    let dataset = load_dataset(&config.data.path)
        .with_context(|| format!("failed to load dataset from {}", config.data.path))?;

    let dashboard = DashboardState::new(
        dataset,
        config.dashboard.title.clone(),
        config.dashboard.logo.clone(),
    );
    let api_server = ApiServer::new(config.clone(), dashboard)?;

    if config.metrics.enabled {
        if let Err(e) = api_server.start_metrics().await {
            error!(error = %e, "Failed to start metrics exporter");
        }
    }

    info!("User dashboard is ready to serve traffic");

    api_server.start_http().await?;

    Ok(())
}
