use anyhow::Context;
use clap::{Parser, ValueEnum};
use standby_core::config::parse_env_value;
use standby_core::constants::{DEFAULT_STARTUP_DELAY_MS, ENV_STARTUP_DELAY_MS};
use standby_core::{StandbyConfig, SystemClock};
use standby_scheduler::{run_continuously, StandbyDriver};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "standbydir")]
#[command(about = "Keep an empty, date-indexed standby directory under each root")]
#[command(
    after_help = "Options are only read before the first root directory. Unknown options are ignored."
)]
struct Cli {
    /// Run once and exit, or keep running on fixed intervals
    #[arg(short, long, value_enum, ignore_case = true, default_value_t = Mode::Once)]
    mode: Mode,
    /// Print one JSON summary line per root after a one-shot run
    #[arg(long)]
    json: bool,
    /// Root directories to manage (must already exist)
    roots: Vec<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Ensure and prune every root, then exit
    #[value(alias = "o")]
    Once,
    /// Ensure every minute and prune every two hours until stopped
    #[value(alias = "c")]
    Continues,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse_from(normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => return report(anyhow::Error::new(e)),
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(e),
    }
}

/// Rewrites the raw command line into the form `Cli` parses.
///
/// Only the leading arguments starting with `-` are options; the first other
/// argument and everything after it are roots, even if they start with `-`.
/// Option names are case-insensitive, unknown options are dropped and only the
/// first occurrence of each option counts.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter().peekable();
    let mut normalized: Vec<OsString> = args.next().into_iter().collect();
    let mut seen: Vec<&'static str> = Vec::new();

    while let Some(arg) = args.next_if(|arg| arg.to_string_lossy().starts_with('-')) {
        let arg = arg.to_string_lossy();
        let (name, value) = match arg.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (&arg[..], None),
        };

        let Some(canonical) = canonical_option(name) else {
            continue;
        };
        if seen.contains(&canonical) {
            continue;
        }
        seen.push(canonical);

        match (canonical, value) {
            ("--mode", Some(value)) => normalized.push(format!("--mode={}", value).into()),
            // a bare --mode keeps the default
            ("--mode", None) => {}
            (flag, _) => normalized.push(flag.into()),
        }
    }

    normalized.push("--".into());
    normalized.extend(args);
    normalized
}

fn canonical_option(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "--mode" | "-m" => Some("--mode"),
        "--json" => Some("--json"),
        "--help" | "-h" => Some("--help"),
        _ => None,
    }
}

/// Writes the failure to standard output and maps it to exit code 1.
fn report(error: anyhow::Error) -> ExitCode {
    println!("Exception:");
    println!("{:?}", error);
    ExitCode::from(1)
}

fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let config = StandbyConfig::from_env_values(|name| std::env::var(name).ok())
        .context("failed to load configuration")?;

    if cli.roots.is_empty() {
        tracing::warn!("No root directories given, nothing to do");
    }

    let driver = StandbyDriver::new(&cli.roots, config, Arc::new(SystemClock))?;

    match cli.mode {
        Mode::Once => {
            let summaries = driver.run_once()?;
            if cli.json {
                for summary in &summaries {
                    println!("{}", serde_json::to_string(summary)?);
                }
            }
        }
        Mode::Continues => {
            let startup_delay = parse_env_value::<u64>(
                ENV_STARTUP_DELAY_MS,
                std::env::var(ENV_STARTUP_DELAY_MS).ok(),
            )?
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_STARTUP_DELAY_MS));

            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            let result = runtime.block_on(run_continuously(
                Arc::new(driver),
                startup_delay,
                wait_for_stop(),
            ));
            // A pending stdin read would otherwise hold the runtime open.
            runtime.shutdown_background();
            result?;
        }
    }

    Ok(())
}

/// Completes on the first line (or end) of standard input, or on Ctrl-C.
async fn wait_for_stop() {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tracing::info!("Running; press Enter or Ctrl-C to stop");

    tokio::select! {
        _ = lines.next_line() => {
            tracing::info!("Stop requested on standard input");
        }
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => tracing::info!("Stop requested by Ctrl-C"),
            Err(e) => tracing::warn!(error = %e, "Failed to listen for Ctrl-C, stopping"),
        },
    }
}

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("standby=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}
