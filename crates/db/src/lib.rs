//! SQLite connection factory and module migration runner.

use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Executor;

use libris_kernel::settings::DatabaseSettings;
use libris_kernel::Migration;

/// Open a connection pool for the configured database URL.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(settings.max_connections);
    if is_in_memory(&settings.url) {
        pool_options = pin_in_memory(pool_options);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to '{}'", settings.url))?;

    tracing::info!(
        target: "libris-db",
        url = %settings.url,
        max_connections = settings.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Keep one connection open for the life of the pool.
///
/// sqlx opens `sqlite::memory:` as a shared-cache database, so every pooled
/// connection sees the same schema, but SQLite discards it as soon as the
/// last connection closes. Idle or lifetime retirement would do exactly that.
fn pin_in_memory(options: SqlitePoolOptions) -> SqlitePoolOptions {
    options
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
}

/// Open a private in-memory database that lives until the pool drops.
pub async fn connect_in_memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    pin_in_memory(SqlitePoolOptions::new().max_connections(1))
        .connect_with(options)
        .await
        .with_context(|| "failed to open in-memory database")
}

/// Apply every migration not yet recorded in the `_migrations` ledger.
///
/// Returns how many migrations were applied. Each migration and its ledger
/// row are committed together.
pub async fn run_migrations(
    pool: &SqlitePool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<usize> {
    pool.execute(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            module     TEXT NOT NULL,
            id         TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (module, id)
        )
        "#,
    )
    .await
    .with_context(|| "failed to create migrations ledger")?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let seen: Option<String> =
            sqlx::query_scalar("SELECT id FROM _migrations WHERE module = ? AND id = ?")
                .bind(module)
                .bind(migration.id)
                .fetch_optional(pool)
                .await?;

        if seen.is_some() {
            tracing::debug!(target: "libris-db", %module, id = migration.id, "migration already applied");
            continue;
        }

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
        sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(target: "libris-db", %module, id = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
