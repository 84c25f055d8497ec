mod backend;
mod candidates;
mod cli;
mod config;
mod coordinator;
mod errors;
mod jobs;
mod models;
mod state;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{handle_command, Cli};
use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr so `list --json` output stays clean
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Starting hirex v{}", env!("CARGO_PKG_VERSION"));

    let mut state = AppState::new(config)?;
    handle_command(cli, &mut state).await
}
