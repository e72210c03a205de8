use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub mod controller;
pub mod events;
pub mod settings;
pub mod shell;
pub mod state;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::settings::{FileSettings, default_settings_path};
use self::state::AppState;

/// Popup translator with a terminal front end.
#[derive(Parser)]
#[command(name = "tolk", version)]
struct Args {
    /// Where runtime settings are persisted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Use a deterministic offline backend instead of the real ones.
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout belongs to the shell.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = tolk_config::Config::new();
    let settings_path = args.settings.unwrap_or_else(default_settings_path);
    let settings = Arc::new(FileSettings::load(&settings_path)?);
    let state = Arc::new(AppState::new(config, settings));

    let mut controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks(args.offline)?;

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("shutdown requested");
        }
        result = tasks.join_next() => {
            match result {
                Some(Ok(Ok(()))) => tracing::debug!("task finished"),
                Some(Ok(Err(e))) => tracing::error!("task exited: {e}"),
                Some(Err(e)) => tracing::error!("task panicked: {e}"),
                None => {}
            }
        }
    }

    controller.shutdown().await;

    // Give the remaining tasks a moment to unwind, then leave.
    while let Ok(Some(result)) =
        tokio::time::timeout(Duration::from_secs(2), tasks.join_next()).await
    {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("task exited during shutdown: {e}"),
            Err(e) => tracing::warn!("task panicked during shutdown: {e}"),
        }
    }

    Ok(())
}
