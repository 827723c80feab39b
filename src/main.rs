//! station-wind: live wind for a single NWS observation station
//!
//! Polls api.weather.gov for the latest observation and shows wind speed,
//! direction, a compass needle and the observation time.
//!
//! Outputs:
//! - terminal: one summary line per cycle on stdout
//! - html: a self-refreshing page with the rotated needle (feature `html`)

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// === Modules ===

mod config;
mod display;
mod poller;
mod sensors;
mod shared;

use display::{terminal::TerminalRenderer, Fanout, Status};
use poller::Poller;

// === CLI ===

#[derive(Parser)]
#[command(name = "station-wind")]
#[command(about = "Live wind speed and direction for an NWS observation station")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll until interrupted (the default)
    Run(RunArgs),
    /// Run a single cycle and exit
    Once(RunArgs),
    /// Open the config file in your editor
    Config,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Station identifier, overrides the config file
    #[arg(long)]
    station: Option<String>,
    /// Seconds between cycles, overrides the config file
    #[arg(long)]
    interval_secs: Option<u64>,
    /// Also write an HTML page to this path
    #[cfg(feature = "html")]
    #[arg(long)]
    html: Option<PathBuf>,
}

impl RunArgs {
    fn apply(self, mut config: config::Config) -> config::Config {
        if let Some(station) = self.station {
            config.station = station;
        }
        if let Some(secs) = self.interval_secs {
            config.refresh_ms = secs.saturating_mul(1000);
        }
        #[cfg(feature = "html")]
        if let Some(path) = self.html {
            config.html_output = Some(path);
        }
        config
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Config) => run_config_command(),
        Some(Commands::Once(args)) => run_once(args).await,
        Some(Commands::Run(args)) => run_poller(args).await,
        None => run_poller(RunArgs::default()).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn build_poller(config: &config::Config) -> anyhow::Result<Arc<Poller<Fanout>>> {
    let mut renderers = Fanout::new();
    renderers.push(TerminalRenderer::stdout());

    #[cfg(feature = "html")]
    if let Some(path) = &config.html_output {
        tracing::info!("Writing HTML page to {}", path.display());
        renderers.push(display::html::HtmlRenderer::new(
            path,
            config.refresh_interval().as_secs(),
        ));
    }
    #[cfg(not(feature = "html"))]
    if config.html_output.is_some() {
        tracing::warn!("html_output is set but this build has no HTML support");
    }

    let client = reqwest::Client::builder().build()?;
    Ok(Arc::new(Poller::new(
        Arc::new(client),
        renderers,
        config.poll_settings(),
    )))
}

/// Open config file in user's editor
fn run_config_command() -> anyhow::Result<bool> {
    let config_path = config::Config::path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    // Create config file with defaults if it doesn't exist
    if !config_path.exists() {
        config::Config::default().save()?;
        println!("Created config file: {}", config_path.display());
    }

    // Get editor from environment or use defaults
    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            #[cfg(target_os = "windows")]
            { "notepad".to_string() }
            #[cfg(not(target_os = "windows"))]
            { "nano".to_string() }
        });

    println!("Opening {} with {}", config_path.display(), editor);

    let status = std::process::Command::new(&editor)
        .arg(&config_path)
        .status()?;

    Ok(status.success())
}

/// Run a single cycle; succeeds only if the status ends up OK
async fn run_once(args: RunArgs) -> anyhow::Result<bool> {
    init_tracing();

    let config = args.apply(config::Config::load());
    let poller = build_poller(&config)?;

    let status = poller.tick().await;
    Ok(matches!(status, Status::Ok(_)))
}

/// Poll until Ctrl-C
async fn run_poller(args: RunArgs) -> anyhow::Result<bool> {
    init_tracing();

    let config = args.apply(config::Config::load());
    let poller = build_poller(&config)?;

    tracing::info!("Starting station-wind for {}", poller.settings().station);
    let handle = poller.start();

    tokio::signal::ctrl_c().await?;

    tracing::info!("Shutting down");
    handle.stop().await;
    tracing::info!("station-wind stopped");
    Ok(true)
}
