//! History repository tests against a real SQLite database.

use std::sync::Arc;

use kk_core::ports::{HistoryRepositoryPort, InsertOutcome};
use kk_core::{HistoryId, HistoryQuery, HistoryRecord, NewHistoryRecord, SortOrder};
use kk_infra::db::mappers::HistoryRowMapper;
use kk_infra::db::pool::{init_db_pool, DbPool};
use kk_infra::db::ports::DbExecutor;
use kk_infra::db::repositories::DieselHistoryRepository;
use kk_infra::db::DieselSqliteExecutor;
use tempfile::TempDir;

const DAY_MS: i64 = 86_400_000;

/// In-memory test executor for testing repositories
struct TestDbExecutor {
    pool: Arc<DbPool>,
}

impl TestDbExecutor {
    fn new() -> Self {
        let pool = Arc::new(init_db_pool(":memory:").expect("Failed to create test DB pool"));
        Self { pool }
    }
}

impl DbExecutor for TestDbExecutor {
    fn run<T>(
        &self,
        f: impl FnOnce(&mut diesel::SqliteConnection) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let mut conn = self.pool.get()?;
        f(&mut conn)
    }
}

fn new_repo() -> DieselHistoryRepository<TestDbExecutor, HistoryRowMapper> {
    DieselHistoryRepository::new(TestDbExecutor::new(), HistoryRowMapper)
}

async fn insert(
    repo: &impl HistoryRepositoryPort,
    input: &str,
    output: &str,
    total_cm: f64,
    ts: i64,
) -> HistoryRecord {
    match repo
        .insert(NewHistoryRecord::new(input, output, total_cm, ts))
        .await
        .unwrap()
    {
        InsertOutcome::Inserted(record) => record,
        InsertOutcome::Duplicate => panic!("unexpected duplicate for {input}"),
    }
}

fn inputs(records: &[HistoryRecord]) -> Vec<&str> {
    records.iter().map(|r| r.input_text.as_str()).collect()
}

#[tokio::test]
async fn test_duplicate_input_output_pair_is_ignored() {
    let repo = new_repo();
    insert(&repo, "1 kol", "72.00 cm", 72.0, 1_000).await;

    let outcome = repo
        .insert(NewHistoryRecord::new("1 kol", "72.00 cm", 72.0, 2_000))
        .await
        .unwrap();

    assert_eq!(outcome, InsertOutcome::Duplicate);
    let all = repo.query(&HistoryQuery::All(SortOrder::ByDate)).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].timestamp_ms, 1_000);
}

#[tokio::test]
async fn test_same_input_with_different_output_is_kept() {
    let repo = new_repo();
    insert(&repo, "150.00 cm", "2 kol 2 viral", 150.0, 1).await;
    insert(&repo, "150.00 cm", "2 kol 2 viral 0 cm", 150.0, 2).await;

    let all = repo.query(&HistoryQuery::All(SortOrder::ByDate)).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_queries_sort_filter_and_limit() {
    let repo = new_repo();
    insert(&repo, "1 kol", "72.00 cm", 72.0, 100).await;
    let favorite = insert(&repo, "3 viral", "9.00 cm", 9.0, 300).await;
    insert(&repo, "2 KOL", "144.00 cm", 144.0, 200).await;
    insert(&repo, "50% off", "1 cm", 1.0, 50).await;
    assert!(repo.update(&favorite.with_favorite(true)).await.unwrap());

    let by_date = repo.query(&HistoryQuery::All(SortOrder::ByDate)).await.unwrap();
    assert_eq!(inputs(&by_date), ["3 viral", "2 KOL", "1 kol", "50% off"]);

    let asc = repo.query(&HistoryQuery::All(SortOrder::BySizeAsc)).await.unwrap();
    assert_eq!(inputs(&asc), ["50% off", "3 viral", "1 kol", "2 KOL"]);

    let desc = repo.query(&HistoryQuery::All(SortOrder::BySizeDesc)).await.unwrap();
    assert_eq!(inputs(&desc), ["2 KOL", "1 kol", "3 viral", "50% off"]);

    let favorites = repo.query(&HistoryQuery::Favorites).await.unwrap();
    assert_eq!(inputs(&favorites), ["3 viral"]);

    let search = repo.query(&HistoryQuery::Search("kol".into())).await.unwrap();
    assert_eq!(inputs(&search), ["2 KOL", "1 kol"]);

    let by_output = repo.query(&HistoryQuery::Search("9.00".into())).await.unwrap();
    assert_eq!(inputs(&by_output), ["3 viral"]);

    // wildcards in the needle match literally
    let literal = repo.query(&HistoryQuery::Search("0%".into())).await.unwrap();
    assert_eq!(inputs(&literal), ["50% off"]);

    let recent = repo.query(&HistoryQuery::Recent(2)).await.unwrap();
    assert_eq!(inputs(&recent), ["3 viral", "2 KOL"]);
}

#[tokio::test]
async fn test_update_and_delete_report_missing_rows() {
    let repo = new_repo();
    let record = insert(&repo, "1 kol", "72.00 cm", 72.0, 1).await;

    assert!(repo.delete(&record.id).await.unwrap());
    assert!(!repo.delete(&record.id).await.unwrap());
    assert!(!repo.update(&record.clone().with_favorite(true)).await.unwrap());
    assert!(repo.get(&record.id).await.unwrap().is_none());
    assert!(repo.get(&HistoryId::from("missing")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_older_than_is_strict() {
    let repo = new_repo();
    let now = 100 * DAY_MS;
    insert(&repo, "old", "a", 1.0, now - 31 * DAY_MS).await;
    insert(&repo, "young", "b", 1.0, now - 29 * DAY_MS).await;
    insert(&repo, "edge", "c", 1.0, now - 30 * DAY_MS).await;

    let deleted = repo.delete_older_than(now - 30 * DAY_MS).await.unwrap();

    assert_eq!(deleted, 1);
    let left = repo.query(&HistoryQuery::All(SortOrder::ByDate)).await.unwrap();
    assert_eq!(inputs(&left), ["young", "edge"]);
    assert_eq!(repo.delete_older_than(now - 30 * DAY_MS).await.unwrap(), 0);
}

#[tokio::test]
async fn test_revision_bumps_on_row_changes() {
    let repo = new_repo();
    let mut changes = repo.changes();
    let start = *changes.borrow_and_update();

    let record = insert(&repo, "1 kol", "72.00 cm", 72.0, 1).await;
    assert!(changes.has_changed().unwrap());
    assert_eq!(*changes.borrow_and_update(), start + 1);

    repo.insert(NewHistoryRecord::new("1 kol", "72.00 cm", 72.0, 2))
        .await
        .unwrap();
    assert!(!changes.has_changed().unwrap());

    repo.delete(&record.id).await.unwrap();
    assert_eq!(*changes.borrow_and_update(), start + 2);

    assert_eq!(repo.delete_all().await.unwrap(), 0);
    assert!(!changes.has_changed().unwrap());
}

#[tokio::test]
async fn test_file_database_persists_across_pools() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("kaikanakku.db");
    let url = db_path.to_str().unwrap();

    {
        let repo = DieselHistoryRepository::new(
            DieselSqliteExecutor::new(init_db_pool(url).unwrap()),
            HistoryRowMapper,
        );
        insert(&repo, "1 kol", "72.00 cm", 72.0, 1).await;
    }

    let repo = DieselHistoryRepository::new(
        DieselSqliteExecutor::new(init_db_pool(url).unwrap()),
        HistoryRowMapper,
    );
    let all = repo.query(&HistoryQuery::All(SortOrder::ByDate)).await.unwrap();
    assert_eq!(inputs(&all), ["1 kol"]);
}
