//! Command handlers: each one drives a use case from the [`App`] and prints the result.

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Result};
use serde::Serialize;
use tracing::{info, info_span, Instrument};

use kk_app::usecases::conversion::ConversionOutcome;
use kk_app::usecases::retention::SweepOutcome;
use kk_app::App;
use kk_core::{HistoryFilter, HistoryId, HistoryRecord, ReuseTarget, Settings};

use crate::cli::{
    CalcCommand, Commands, ConvertCommand, Direction, FilterArgs, HistoryCommand,
    SettingsCommand, SettingsSetArgs,
};

/// Output mode shared by every handler.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        if self.json {
            serde_json::to_writer(&mut stdout, value)?;
            writeln!(stdout)?;
        } else {
            writeln!(stdout, "{}", text())?;
        }
        Ok(())
    }
}

pub async fn dispatch(
    app: &App,
    command: Commands,
    out: Output,
    retention_period: Duration,
) -> Result<()> {
    match command {
        Commands::Convert(cmd) => convert(app, cmd, out),
        Commands::Calc(cmd) => calc(app, cmd, out),
        Commands::History(cmd) => history(app, cmd, out).await,
        Commands::Settings(cmd) => settings(app, cmd, out).await,
        Commands::Sweep => sweep(app, out).await,
        Commands::Daemon => daemon(app, retention_period).await,
    }
}

fn print_outcome(outcome: &ConversionOutcome, out: Output) -> Result<()> {
    out.emit(outcome, || {
        format!("{} = {}", outcome.input_text, outcome.output_text)
    })
}

fn convert(app: &App, cmd: ConvertCommand, out: Output) -> Result<()> {
    let outcome = match cmd {
        ConvertCommand::Kol { kol, viral, cm } => app
            .usecases()
            .convert_kol_to_cm()
            .execute_raw(&kol, &viral, &cm)?,
        ConvertCommand::Cm { cm } => app.usecases().convert_cm_to_kol().execute_raw(&cm)?,
    };
    print_outcome(&outcome, out)
}

fn calc(app: &App, cmd: CalcCommand, out: Output) -> Result<()> {
    let calculate = app.usecases().calculate();
    let outcome = match cmd {
        CalcCommand::Add { a, b } => calculate.add(a, b)?,
        CalcCommand::Sub { a, b } => calculate.subtract(a, b)?,
        CalcCommand::Mul {
            operand: (kol, viral),
            multiplier,
        } => calculate.multiply_raw(kol, viral, &multiplier)?,
    };
    print_outcome(&outcome, out)
}

fn filter_from_args(args: FilterArgs) -> HistoryFilter {
    HistoryFilter {
        sort_order: args.sort,
        search_query: args.search.unwrap_or_default(),
        favorites_only: args.favorites,
    }
}

fn format_record(record: &HistoryRecord) -> String {
    let when = chrono::DateTime::from_timestamp_millis(record.timestamp_ms)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| record.timestamp_ms.to_string());
    let star = if record.is_favorite { "★" } else { " " };
    format!(
        "{}  {}  {} {} = {}",
        record.id, when, star, record.input_text, record.output_text
    )
}

fn print_records(records: &[HistoryRecord], out: Output) -> Result<()> {
    out.emit(&records, || {
        if records.is_empty() {
            "(no history)".to_string()
        } else {
            records
                .iter()
                .map(format_record)
                .collect::<Vec<_>>()
                .join("\n")
        }
    })
}

async fn history(app: &App, cmd: HistoryCommand, out: Output) -> Result<()> {
    let uc = app.usecases();
    match cmd {
        HistoryCommand::List(args) => {
            let records = uc.list_history().execute(&filter_from_args(args)).await?;
            print_records(&records, out)
        }
        HistoryCommand::Recent => {
            let records = uc.list_recent_history().execute().await?;
            print_records(&records, out)
        }
        HistoryCommand::Watch {
            filter,
            max_updates,
        } => watch_history(app, filter_from_args(filter), max_updates, out).await,
        HistoryCommand::Favorite { id, off } => {
            let id = HistoryId::from(id);
            let Some(record) = uc.toggle_favorite().set(&id, !off).await? else {
                bail!("no history record with id {id}");
            };
            out.emit(&record, || format_record(&record))
        }
        HistoryCommand::Delete { id } => {
            uc.delete_history_record().execute(HistoryId::from(id.clone()));
            out.emit(&serde_json::json!({ "deleted": id }), || format!("deleted {id}"))
        }
        HistoryCommand::Clear => {
            uc.clear_history().execute();
            out.emit(&serde_json::json!({ "cleared": true }), || {
                "history cleared".to_string()
            })
        }
        HistoryCommand::Reuse { id } => {
            let id = HistoryId::from(id);
            let Some(target) = uc.reuse_history_record().execute(&id).await? else {
                bail!("no history record with id {id}");
            };
            let outcome = match target {
                ReuseTarget::CmToKol { total_cm } => {
                    uc.convert_cm_to_kol().execute(total_cm)?
                }
                ReuseTarget::KolToCm(measurement) => {
                    uc.convert_kol_to_cm().execute(measurement)?
                }
            };
            print_outcome(&outcome, out)
        }
    }
}

async fn watch_history(
    app: &App,
    filter: HistoryFilter,
    max_updates: Option<usize>,
    out: Output,
) -> Result<()> {
    let composer = app.usecases().history_composer(filter.clone());
    let mut rx = composer.subscribe();
    info!(query = ?composer.selected_query(), "watching history");

    // The composer may publish its first result before we subscribed, so start from
    // a one-shot read and only print lists that differ from the last one shown.
    let mut last = app.usecases().list_history().execute(&filter).await?;
    print_records(&last, out)?;
    let mut shown = 1usize;

    while !max_updates.is_some_and(|max| shown >= max) {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let records = rx.borrow_and_update().clone();
                if records == last {
                    continue;
                }
                print_records(&records, out)?;
                last = records;
                shown += 1;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

fn apply_settings_args(mut settings: Settings, args: SettingsSetArgs) -> Settings {
    if let Some(precision) = args.precision {
        settings.precision_enabled = precision;
    }
    if let Some(rounding) = args.rounding {
        settings.rounding_mode = rounding;
    }
    if let Some(days) = args.auto_delete_days {
        settings.auto_delete_days = days;
    }
    if let Some(language) = args.language {
        settings.language = language;
    }
    if let Some(direction) = args.default_direction {
        settings.cm_to_kol_default = direction == Direction::CmToKol;
    }
    settings
}

fn format_settings(settings: &Settings) -> String {
    let retention = if settings.auto_delete_days > 0 {
        format!("{} days", settings.auto_delete_days)
    } else {
        "off".to_string()
    };
    [
        format!("precision:         {}", settings.precision_enabled),
        format!("rounding:          {}", settings.rounding_mode),
        format!("auto delete:       {retention}"),
        format!("language:          {}", settings.language),
        format!(
            "default converter: {}",
            if settings.cm_to_kol_default {
                "cm → kol"
            } else {
                "kol → cm"
            }
        ),
    ]
    .join("\n")
}

async fn settings(app: &App, cmd: SettingsCommand, out: Output) -> Result<()> {
    let uc = app.usecases();
    let settings = match cmd {
        SettingsCommand::Show => uc.get_settings().execute().await?,
        SettingsCommand::Set(args) => {
            if args.is_empty() {
                bail!("nothing to change; pass at least one option");
            }
            let updated = apply_settings_args(uc.get_settings().execute().await?, args);
            uc.update_settings().execute(updated.clone()).await?;
            updated
        }
        SettingsCommand::Reset => uc.reset_settings().execute().await?,
    };
    out.emit(&settings, || format_settings(&settings))
}

async fn sweep(app: &App, out: Output) -> Result<()> {
    let outcome = app.usecases().sweep_expired_history().execute().await?;
    out.emit(&outcome, || match outcome {
        SweepOutcome::Disabled => "retention is off".to_string(),
        SweepOutcome::Swept { deleted, .. } => format!("deleted {deleted} expired records"),
    })
}

async fn daemon(app: &App, retention_period: Duration) -> Result<()> {
    let span = info_span!("daemon", period_secs = retention_period.as_secs());
    async {
        app.schedule_retention(retention_period)?;
        info!("daemon running, press Ctrl+C to stop");
        tokio::signal::ctrl_c().await?;
        info!("stop requested");
        Ok(())
    }
    .instrument(span)
    .await
}
