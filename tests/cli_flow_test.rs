//! Runs parsed command lines against a temporary data directory backed by SQLite.

use std::path::Path;

use clap::Parser;
use kaikanakku::bootstrap::{resolve_config, wire_dependencies, HistoryBackend, RuntimeConfig};
use kaikanakku::cli::Cli;
use kaikanakku::run_with_config;
use kk_core::config::AppConfig;
use kk_core::ports::HistoryRepositoryPort;
use kk_core::{HistoryQuery, SortOrder};

fn config_in(dir: &Path) -> RuntimeConfig {
    resolve_config(AppConfig::empty(), dir.to_path_buf())
}

async fn run(config: &RuntimeConfig, args: &[&str]) -> anyhow::Result<()> {
    let argv = std::iter::once("kaikanakku").chain(args.iter().copied());
    let cli = Cli::try_parse_from(argv)?;
    run_with_config(cli, config).await
}

async fn stored_inputs(config: &RuntimeConfig) -> Vec<String> {
    let deps = wire_dependencies(config, HistoryBackend::Sqlite).unwrap();
    deps.history_repo
        .query(&HistoryQuery::All(SortOrder::ByDate))
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.input_text)
        .collect()
}

#[tokio::test]
async fn conversions_persist_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    run(&config, &["convert", "cm", "151.5"]).await.unwrap();
    run(&config, &["calc", "add", "1:0:0", "0:1:0"]).await.unwrap();
    // Identical conversion: suppressed by the store.
    run(&config, &["convert", "cm", "151.5"]).await.unwrap();

    let inputs = stored_inputs(&config).await;
    assert_eq!(inputs.len(), 2);
    assert!(inputs.contains(&"151.50 cm".to_string()));
    assert!(inputs.contains(&"1 kol + 1 viral".to_string()));
}

#[tokio::test]
async fn invalid_subtraction_fails_without_recording() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let err = run(&config, &["calc", "sub", "0:1:0", "1:0:0"])
        .await
        .unwrap_err();

    assert!(err.to_string().contains("cannot subtract"), "got: {err:#}");
    assert!(stored_inputs(&config).await.is_empty());
}

#[tokio::test]
async fn in_memory_runs_leave_the_database_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    run(&config, &["--in-memory", "convert", "kol", "1", "2", "1.5"])
        .await
        .unwrap();

    assert!(!config.database_path.exists());
}

#[tokio::test]
async fn settings_set_is_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    run(
        &config,
        &["settings", "set", "--precision", "true", "--auto-delete-days", "30"],
    )
    .await
    .unwrap();

    let json = std::fs::read_to_string(&config.settings_path).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(saved["precision_enabled"], true);
    assert_eq!(saved["auto_delete_days"], 30);

    run(&config, &["settings", "reset"]).await.unwrap();
    let json = std::fs::read_to_string(&config.settings_path).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(saved["precision_enabled"], false);
}

#[tokio::test]
async fn settings_set_rejects_unknown_language() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let err = run(&config, &["settings", "set", "--language", "xx"])
        .await
        .unwrap_err();

    assert!(err.to_string().contains("xx"), "got: {err:#}");
}

#[tokio::test]
async fn favorite_of_missing_record_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let err = run(&config, &["history", "favorite", "does-not-exist"])
        .await
        .unwrap_err();

    assert!(err.to_string().contains("does-not-exist"));
}

#[tokio::test]
async fn sweep_with_retention_off_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    run(&config, &["convert", "cm", "72"]).await.unwrap();
    run(&config, &["sweep"]).await.unwrap();

    assert_eq!(stored_inputs(&config).await.len(), 1);
}
