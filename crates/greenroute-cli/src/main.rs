use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use greenroute_application::RouteProgress;
use greenroute_core::error::RouteError;
use greenroute_infrastructure::GreenRoutePaths;

mod commands;
mod context;
mod logging;

use context::Overrides;

#[derive(Parser)]
#[command(name = "greenroute")]
#[command(about = "GreenRoute - walk a pickup route stop by stop", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config and GREENROUTE_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log in with the legacy per-pickup protocol
    #[arg(long, global = true)]
    legacy: bool,

    /// Directory holding the active session file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Debug logging when RUST_LOG is unset
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate and start the day's route
    Login {
        /// Vehicle registration number (8-15 characters)
        vehicle: String,
        /// Driving licence number (10-20 characters)
        license: String,
    },
    /// Show the stop the driver is on
    Current {
        #[arg(long)]
        json: bool,
    },
    /// Print a maps directions link to the current stop
    Navigate {
        #[arg(long)]
        json: bool,
    },
    /// Start timing the current stop
    Start,
    /// Complete the current stop and move to the next
    Complete {
        /// Collected weight in kg (0.1-1000)
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
        /// Photo file to upload with the completion
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Skip the current pickup (legacy protocol)
    Skip {
        reason: String,
    },
    /// Show local route progress
    Progress {
        #[arg(long)]
        json: bool,
    },
    /// Ask the server for assignment progress
    RemoteProgress,
    /// Re-download the legacy pickup list
    Refresh,
    /// Show session state
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Forget the active session
    Logout,
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a default config.toml
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logs_dir = GreenRoutePaths::logs_dir().context("Failed to resolve logs directory")?;
    let _logging = logging::init_logging(&logs_dir, cli.verbose)
        .with_context(|| format!("Failed to initialize logging in {}", logs_dir.display()))?;

    let overrides = Overrides {
        base_url: cli.base_url,
        legacy: cli.legacy,
        data_dir: cli.data_dir,
    };

    if let Commands::Config { action: ConfigAction::Init { force } } = cli.command {
        return commands::config::init(force);
    }

    let config = context::load_config(&overrides)?;
    if let Commands::Config { action: ConfigAction::Show } = cli.command {
        return commands::config::show(&config);
    }

    let progress = context::build_route_progress(&config, &overrides)?;

    let outcome = run(&progress, cli.command).await;
    if let Err(err) = &outcome {
        let remote = err
            .downcast_ref::<RouteError>()
            .is_some_and(RouteError::is_remote_failure);
        if remote {
            eprintln!("Backend request to {} failed.", config.base_url);
        }
    }
    outcome
}

async fn run(progress: &RouteProgress, command: Commands) -> Result<()> {
    match command {
        Commands::Login { vehicle, license } => {
            commands::route::login(progress, &vehicle, &license).await?
        }
        Commands::Current { json } => commands::route::current(progress, json).await?,
        Commands::Navigate { json } => commands::route::navigate(progress, json).await?,
        Commands::Start => commands::route::start(progress).await?,
        Commands::Complete {
            weight,
            notes,
            photo,
        } => commands::route::complete(progress, weight, notes, photo).await?,
        Commands::Skip { reason } => commands::route::skip(progress, &reason).await?,
        Commands::Progress { json } => commands::route::show_progress(progress, json).await?,
        Commands::RemoteProgress => commands::route::remote_progress(progress).await?,
        Commands::Refresh => commands::route::refresh(progress).await?,
        Commands::Status { json } => commands::route::status(progress, json).await?,
        Commands::Logout => commands::route::logout(progress).await?,
        Commands::Config { .. } => {}
    }
    Ok(())
}
