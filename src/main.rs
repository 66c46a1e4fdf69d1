//! Student API server: loads config, opens storage, serves until SIGINT/SIGTERM.

use clap::Parser;
use std::path::PathBuf;
use student_api::{build_router, new_storage, serve, shutdown_signal, AppConfig, AppState, Shutdown};
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(name = "student-api", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("student_api=info,tower_http=info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        tracing::error!(error = %e, "fatal");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(cli.config)?;
    tracing::info!(env = %config.env, driver = %config.db_driver, "configuration loaded");

    let storage = new_storage(&config).await?;
    let app = build_router(AppState::new(storage.clone()));

    let listener = TcpListener::bind(config.http_server.address.as_str()).await?;
    tracing::info!(address = %listener.local_addr()?, "server started");

    let outcome = serve(listener, app, shutdown_signal(), config.http_server.shutdown_grace()).await;
    storage.close().await;
    match outcome? {
        Shutdown::Graceful => tracing::info!("server shutdown successfully"),
        Shutdown::Forced => tracing::warn!("server shutdown forced after grace period"),
    }
    Ok(())
}
