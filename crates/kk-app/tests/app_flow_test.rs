//! End-to-end flow through the App facade with in-memory history and a file-backed
//! settings store.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kk_app::{App, AppDeps};
use kk_core::ports::{ClockPort, SettingsPort};
use kk_core::{HistoryFilter, Measurement, ReuseTarget, Settings};
use kk_infra::memory::InMemoryHistoryRepository;
use kk_infra::settings::FileSettingsRepository;
use kk_infra::TokioScheduler;

const START_MS: i64 = 1_700_000_000_000;

/// Advances one second per reading so every record gets a distinct timestamp.
struct SteppingClock(AtomicI64);

impl ClockPort for SteppingClock {
    fn now_ms(&self) -> i64 {
        self.0.fetch_add(1_000, Ordering::SeqCst)
    }
}

async fn start_app(dir: &tempfile::TempDir) -> App {
    let deps = AppDeps {
        history_repo: Arc::new(InMemoryHistoryRepository::new()),
        settings: Arc::new(FileSettingsRepository::new(dir.path().join("settings.json"))),
        clock: Arc::new(SteppingClock(AtomicI64::new(START_MS))),
        scheduler: Arc::new(TokioScheduler::new(Duration::from_secs(1))),
    };
    App::start(deps).await.expect("app starts")
}

#[tokio::test]
async fn conversions_are_recorded_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    let app = start_app(&dir).await;
    let uc = app.usecases();

    let kol = uc.convert_kol_to_cm().execute_raw("1", "2", "1.5").unwrap();
    assert_eq!(kol.output_text, "79.50 cm");

    let cm = uc.convert_cm_to_kol().execute(151.5).unwrap();
    assert_eq!(cm.output_text, "2 kol 2 viral 2 cm");

    // Same input and output again: must not create a second row.
    uc.convert_cm_to_kol().execute(151.5).unwrap();

    app.writer().flush().await.unwrap();

    let recent = uc.list_recent_history().execute().await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].input_text, "151.50 cm");
    assert_eq!(recent[1].input_text, "1 kol 2 viral 1.5 cm");

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn invalid_input_is_not_recorded() {
    let dir = tempfile::tempdir().unwrap();
    let app = start_app(&dir).await;
    let uc = app.usecases();

    assert!(uc.convert_kol_to_cm().execute_raw("1", "24", "0").is_err());
    assert!(uc
        .calculate()
        .subtract(Measurement::new(0, 1, 0.0), Measurement::new(1, 0, 0.0))
        .is_err());

    app.writer().flush().await.unwrap();
    assert!(uc.list_recent_history().execute().await.unwrap().is_empty());
}

#[tokio::test]
async fn settings_changes_apply_to_next_conversion_and_persist() {
    let dir = tempfile::tempdir().unwrap();
    let app = start_app(&dir).await;
    let uc = app.usecases();

    uc.update_settings()
        .execute(Settings {
            precision_enabled: true,
            ..Settings::default()
        })
        .await
        .unwrap();

    let outcome = uc.convert_cm_to_kol().execute(151.5).unwrap();
    assert_eq!(outcome.output_text, "2 kol 2 viral 1.5 cm");

    let reloaded = FileSettingsRepository::new(dir.path().join("settings.json"))
        .load()
        .await
        .unwrap();
    assert!(reloaded.precision_enabled);

    let reset = uc.reset_settings().execute().await.unwrap();
    assert_eq!(reset, Settings::default());
    assert_eq!(uc.get_settings().execute().await.unwrap(), Settings::default());
}

#[tokio::test]
async fn favorites_reuse_and_clear() {
    let dir = tempfile::tempdir().unwrap();
    let app = start_app(&dir).await;
    let uc = app.usecases();

    uc.convert_cm_to_kol().execute(72.0).unwrap();
    uc.calculate()
        .add(Measurement::new(1, 0, 0.0), Measurement::new(0, 1, 0.0))
        .unwrap();
    app.writer().flush().await.unwrap();

    let all = uc.list_history().execute(&HistoryFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    let cm_record = all
        .iter()
        .find(|r| r.input_text == "72.00 cm")
        .cloned()
        .unwrap();

    let favorite = uc
        .toggle_favorite()
        .set(&cm_record.id, true)
        .await
        .unwrap()
        .unwrap();
    assert!(favorite.is_favorite);
    app.writer().flush().await.unwrap();

    let favorites = uc
        .list_history()
        .execute(&HistoryFilter {
            favorites_only: true,
            ..HistoryFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, cm_record.id);

    let target = uc.reuse_history_record().execute(&cm_record.id).await.unwrap();
    assert_eq!(target, Some(ReuseTarget::CmToKol { total_cm: 72.0 }));

    uc.clear_history().execute();
    app.writer().flush().await.unwrap();
    assert!(uc
        .list_history()
        .execute(&HistoryFilter::default())
        .await
        .unwrap()
        .is_empty());
    assert_eq!(uc.reuse_history_record().execute(&cm_record.id).await.unwrap(), None);
}

#[tokio::test]
async fn retention_is_registered_once() {
    let dir = tempfile::tempdir().unwrap();
    let app = start_app(&dir).await;

    assert!(app.schedule_retention(Duration::from_secs(3600)).unwrap());
    assert!(!app.schedule_retention(Duration::from_secs(3600)).unwrap());

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn settings_from_a_newer_file_can_still_be_updated() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{ "schema_version": 3, "precision_enabled": true }"#,
    )
    .unwrap();
    let app = start_app(&dir).await;
    let uc = app.usecases();

    let mut settings = uc.get_settings().execute().await.unwrap();
    assert!(settings.precision_enabled);
    settings.auto_delete_days = 7;

    uc.update_settings().execute(settings).await.unwrap();
    assert_eq!(uc.get_settings().execute().await.unwrap().auto_delete_days, 7);
    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn reusing_a_record_with_rounded_cm_converts_again() {
    let dir = tempfile::tempdir().unwrap();
    let app = start_app(&dir).await;
    let uc = app.usecases();

    let outcome = uc.convert_kol_to_cm().execute_raw("1", "", "2.96").unwrap();
    assert_eq!(outcome.input_text, "1 kol 3.0 cm");
    app.writer().flush().await.unwrap();

    let record = uc.list_recent_history().execute().await.unwrap().remove(0);
    let Some(ReuseTarget::KolToCm(measurement)) =
        uc.reuse_history_record().execute(&record.id).await.unwrap()
    else {
        panic!("expected a kol target");
    };

    let again = uc.convert_kol_to_cm().execute(measurement).unwrap();
    assert_eq!(again.output_text, "74.90 cm");
    app.shutdown().await.unwrap();
}
