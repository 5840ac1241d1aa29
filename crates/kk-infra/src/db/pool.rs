use std::time::Duration;

use anyhow::{Context, Result};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

/// Embed all diesel migrations at compile time
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Type alias for SQLite connection pool
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

pub const IN_MEMORY_DATABASE_URL: &str = ":memory:";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Applied to every connection the pool hands out, so concurrent writers wait
/// on the SQLite lock instead of failing with `SQLITE_BUSY`.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create database connection pool and run migrations
///
/// This function should be called **once at application startup**.
///
/// An in-memory database only exists for the lifetime of its connection, so
/// `":memory:"` gets a single connection that is never recycled.
pub fn init_db_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let customizer = SqlitePragmas {
        busy_timeout: BUSY_TIMEOUT,
    };

    let builder = Pool::builder().connection_customizer(Box::new(customizer));
    let builder = if database_url == IN_MEMORY_DATABASE_URL {
        builder.max_size(1).idle_timeout(None).max_lifetime(None)
    } else {
        builder
    };

    let pool = builder
        .build(manager)
        .with_context(|| format!("create database pool failed: {database_url}"))?;

    run_migrations(&pool)?;

    Ok(pool)
}

/// Run embedded Diesel migrations
fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().context("acquire connection for migrations failed")?;

    info!("Running database migrations...");
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    info!("Database migrations completed");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::prelude::*;
    use diesel::sql_types::BigInt;

    #[derive(QueryableByName)]
    struct Count {
        #[diesel(sql_type = BigInt)]
        n: i64,
    }

    #[test]
    fn in_memory_pool_runs_migrations() {
        let pool = init_db_pool(IN_MEMORY_DATABASE_URL).unwrap();
        let mut conn = pool.get().unwrap();

        let rows: Vec<Count> = diesel::sql_query(
            "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' AND name = 'history_record'",
        )
        .load(&mut conn)
        .unwrap();

        assert_eq!(rows[0].n, 1);
    }

    #[test]
    fn reopening_file_database_is_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("kk.db");
        let url = db_path.to_str().unwrap();

        drop(init_db_pool(url).unwrap());
        let pool = init_db_pool(url).unwrap();
        let mut conn = pool.get().unwrap();

        let rows: Vec<Count> = diesel::sql_query("SELECT COUNT(*) AS n FROM history_record")
            .load(&mut conn)
            .unwrap();

        assert_eq!(rows[0].n, 0);
    }
}
