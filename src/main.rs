use anyhow::Context;
use standby_core::config::parse_env_value;
use standby_core::constants::{DEFAULT_STARTUP_DELAY_MS, ENV_ROOT_DIRS, ENV_STARTUP_DELAY_MS};
use standby_core::{StandbyConfig, SystemClock};
use standby_scheduler::{run_continuously, StandbyDriver};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the standby directory service
///
/// Keeps every configured root supplied with an empty standby directory and
/// prunes unused ones, until the process receives Ctrl-C or SIGTERM.
///
/// # Environment Variables
/// - `STANDBY_ROOT_DIRS`: root directories, separated like `PATH` (required)
/// - `STANDBY_STARTUP_DELAY_MS`: pause before the first run (default: 2000)
/// - `STANDBY_MAX_PER_DATE`, `STANDBY_PRUNE_WINDOW_DAYS`, `STANDBY_PRUNE_BIAS_HOURS`,
///   `STANDBY_ENSURE_INTERVAL_SECS`, `STANDBY_PRUNE_INTERVAL_SECS`: see `StandbyConfig`
///
/// # Returns
/// * `Ok(())` - After a clean shutdown
/// * `Err(anyhow::Error)` - If configuration is invalid or a root is missing
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("standby=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let roots = root_dirs_from_env_value(std::env::var_os(ENV_ROOT_DIRS))?;
    let config = StandbyConfig::from_env_values(|name| std::env::var(name).ok())
        .context("failed to load configuration")?;
    let startup_delay =
        parse_env_value::<u64>(ENV_STARTUP_DELAY_MS, std::env::var(ENV_STARTUP_DELAY_MS).ok())?
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_STARTUP_DELAY_MS));

    for root in &roots {
        tracing::info!("++ Watching {}", root.display());
    }

    let driver = StandbyDriver::new(&roots, config, Arc::new(SystemClock))?;
    run_continuously(Arc::new(driver), startup_delay, shutdown_signal()).await?;

    tracing::info!("-- Standby service stopped");
    Ok(())
}

/// Splits the `STANDBY_ROOT_DIRS` value into paths, ignoring empty segments.
fn root_dirs_from_env_value(value: Option<std::ffi::OsString>) -> anyhow::Result<Vec<PathBuf>> {
    let roots: Vec<PathBuf> = value
        .as_deref()
        .map(|v| {
            std::env::split_paths(v)
                .filter(|p| !p.as_os_str().is_empty())
                .collect()
        })
        .unwrap_or_default();

    if roots.is_empty() {
        anyhow::bail!("{} must list at least one root directory", ENV_ROOT_DIRS);
    }
    Ok(roots)
}

/// Completes on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
