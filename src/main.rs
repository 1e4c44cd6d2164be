use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use gpu_drop_watcher::fetcher::NvidiaApiClient;
use gpu_drop_watcher::plugins::NotifierDispatcher;
use gpu_drop_watcher::{AppConfig, AppError, IntervalPolicy, PollScheduler, StockChecker, WatchTargets};

#[derive(Debug, Parser)]
#[command(name = "gpu-drop-watcher", version, about = "Watches NVIDIA GPU stock and sends alerts")]
struct Cli {
    /// Optional TOML settings file, overridden by environment variables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dotenv file to load instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.env_file {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gpu_drop_watcher=info".parse()?),
        )
        .init();

    info!("Starting GPU Drop Watcher...");

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(AppError::NoGpuSelected) => {
            info!("{}", AppError::NoGpuSelected);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let source = NvidiaApiClient::new(config.request_timeout)?;
    let notify_client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;
    let dispatcher = NotifierDispatcher::from_config(&config.notifications, notify_client);
    if dispatcher.is_empty() {
        warn!("No notification channels configured, availability will only be logged");
    } else {
        info!("Notification channels: {}", dispatcher.list_notifier_types().join(", "));
    }

    let checker = StockChecker::new(
        Arc::new(source),
        dispatcher,
        config.endpoints.clone(),
        WatchTargets::from_config(&config),
    );
    let mut scheduler = PollScheduler::new(checker, config.window.clone(), IntervalPolicy::new(config.interval));

    tokio::select! {
        _ = scheduler.run() => {}
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutting down...");
        }
    }

    Ok(())
}
