//! KaiKanakku command-line front end.
//!
//! `bootstrap` turns flags and the optional config file into wired [`kk_app::AppDeps`];
//! `commands` runs one subcommand against the started [`kk_app::App`].

pub mod bootstrap;
pub mod cli;
pub mod commands;

use anyhow::Result;
use tracing::debug;

use bootstrap::{HistoryBackend, RuntimeConfig};
use cli::Cli;
use commands::Output;

/// Runs a parsed command line against a resolved configuration.
///
/// Tracing is left to the caller so tests can run commands without a global subscriber.
pub async fn run_with_config(cli: Cli, config: &RuntimeConfig) -> Result<()> {
    let backend = if cli.in_memory {
        HistoryBackend::InMemory
    } else {
        HistoryBackend::Sqlite
    };

    let deps = bootstrap::wire_dependencies(config, backend)?;
    let app = kk_app::App::start(deps)
        .await?
        .with_recent_limit(config.recent_limit);

    let out = Output { json: cli.json };
    let result = commands::dispatch(&app, cli.command, out, config.retention_period).await;

    // Queued history writes must land even when the command failed.
    app.shutdown().await?;
    debug!("command finished");
    result
}
