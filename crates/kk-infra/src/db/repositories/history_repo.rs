use anyhow::Context;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use tokio::sync::watch;
use tracing::debug;

use kk_core::ports::{HistoryRepositoryPort, InsertOutcome};
use kk_core::{HistoryId, HistoryQuery, HistoryRecord, NewHistoryRecord, SortOrder};

use crate::db::models::HistoryRow;
use crate::db::ports::{DbExecutor, InsertMapper, RowMapper};
use crate::db::schema::history_record::{self, dsl};

const LIKE_ESCAPE: char = '\\';

pub struct DieselHistoryRepository<E, M> {
    executor: E,
    mapper: M,
    revision: watch::Sender<u64>,
}

impl<E, M> DieselHistoryRepository<E, M> {
    pub fn new(executor: E, mapper: M) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            executor,
            mapper,
            revision,
        }
    }

    fn bump_revision(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

fn escape_like(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn build_query(query: &HistoryQuery) -> history_record::BoxedQuery<'static, Sqlite> {
    let base = history_record::table.into_boxed();
    match query {
        HistoryQuery::All(SortOrder::ByDate) => base.order(dsl::created_at_ms.desc()),
        HistoryQuery::All(SortOrder::BySizeAsc) => base
            .order(dsl::total_cm.asc())
            .then_order_by(dsl::created_at_ms.desc()),
        HistoryQuery::All(SortOrder::BySizeDesc) => base
            .order(dsl::total_cm.desc())
            .then_order_by(dsl::created_at_ms.desc()),
        HistoryQuery::Favorites => base
            .filter(dsl::is_favorite.eq(true))
            .order(dsl::created_at_ms.desc()),
        HistoryQuery::Search(needle) => {
            let pattern = escape_like(needle);
            base.filter(
                dsl::input_text
                    .like(pattern.clone())
                    .escape(LIKE_ESCAPE)
                    .or(dsl::output_text.like(pattern).escape(LIKE_ESCAPE)),
            )
            .order(dsl::created_at_ms.desc())
        }
        HistoryQuery::Recent(limit) => base
            .order(dsl::created_at_ms.desc())
            .limit(i64::try_from(*limit).unwrap_or(i64::MAX)),
    }
}

#[async_trait]
impl<E, M> HistoryRepositoryPort for DieselHistoryRepository<E, M>
where
    E: DbExecutor,
    M: InsertMapper<HistoryRecord, HistoryRow> + RowMapper<HistoryRow, HistoryRecord>,
{
    async fn insert(&self, record: NewHistoryRecord) -> anyhow::Result<InsertOutcome> {
        let record = record.into_record(HistoryId::new());
        let row = self.mapper.to_row(&record)?;

        let inserted = self.executor.run(|conn| {
            diesel::insert_or_ignore_into(history_record::table)
                .values(&row)
                .execute(conn)
                .context("insert history record failed")
        })?;

        if inserted == 0 {
            debug!(input = %record.input_text, "duplicate history record ignored");
            return Ok(InsertOutcome::Duplicate);
        }

        self.bump_revision();
        Ok(InsertOutcome::Inserted(record))
    }

    async fn update(&self, record: &HistoryRecord) -> anyhow::Result<bool> {
        let row = self.mapper.to_row(record)?;

        let affected = self.executor.run(|conn| {
            diesel::update(dsl::history_record.filter(dsl::id.eq(&row.id)))
                .set((
                    dsl::input_text.eq(&row.input_text),
                    dsl::output_text.eq(&row.output_text),
                    dsl::total_cm.eq(row.total_cm),
                    dsl::created_at_ms.eq(row.created_at_ms),
                    dsl::is_favorite.eq(row.is_favorite),
                ))
                .execute(conn)
                .with_context(|| format!("update history record {} failed", row.id))
        })?;

        if affected > 0 {
            self.bump_revision();
        }
        Ok(affected > 0)
    }

    async fn delete(&self, history_id: &HistoryId) -> anyhow::Result<bool> {
        let affected = self.executor.run(|conn| {
            diesel::delete(dsl::history_record.filter(dsl::id.eq(history_id.as_str())))
                .execute(conn)
                .with_context(|| format!("delete history record {history_id} failed"))
        })?;

        if affected > 0 {
            self.bump_revision();
        }
        Ok(affected > 0)
    }

    async fn delete_all(&self) -> anyhow::Result<usize> {
        let affected = self.executor.run(|conn| {
            diesel::delete(dsl::history_record)
                .execute(conn)
                .context("clear history failed")
        })?;

        if affected > 0 {
            self.bump_revision();
        }
        Ok(affected)
    }

    async fn delete_older_than(&self, cutoff_ms: i64) -> anyhow::Result<usize> {
        let affected = self.executor.run(|conn| {
            diesel::delete(dsl::history_record.filter(dsl::created_at_ms.lt(cutoff_ms)))
                .execute(conn)
                .with_context(|| format!("delete history older than {cutoff_ms} failed"))
        })?;

        if affected > 0 {
            self.bump_revision();
        }
        Ok(affected)
    }

    async fn get(&self, history_id: &HistoryId) -> anyhow::Result<Option<HistoryRecord>> {
        self.executor.run(|conn| {
            let row = dsl::history_record
                .filter(dsl::id.eq(history_id.as_str()))
                .first::<HistoryRow>(conn)
                .optional()
                .with_context(|| format!("load history record {history_id} failed"))?;

            row.map(|r| self.mapper.to_domain(&r)).transpose()
        })
    }

    async fn query(&self, query: &HistoryQuery) -> anyhow::Result<Vec<HistoryRecord>> {
        self.executor.run(|conn| {
            let rows = build_query(query)
                .load::<HistoryRow>(conn)
                .with_context(|| format!("history query {query:?} failed"))?;

            let mut records = Vec::with_capacity(rows.len());
            for row in rows {
                let record = self.mapper.to_domain(&row).map_err(|e| {
                    anyhow::anyhow!("Failed to map history row {}: {}", row.id, e)
                })?;
                records.push(record);
            }
            Ok(records)
        })
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
