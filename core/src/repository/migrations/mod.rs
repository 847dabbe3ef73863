//! SQLite schema migrations, tracked through `PRAGMA user_version`.

use rusqlite::Connection;

use super::{RepoError, RepoResult};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_unique_order.sql"),
    },
];

/// Latest schema version this binary knows how to produce.
fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Bring `conn` up to `latest_version()` inside one transaction.
pub(super) fn apply_migrations(conn: &mut Connection) -> RepoResult<()> {
    let current = current_user_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(RepoError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        tracing::info!(version = migration.version, "applied schema migration");
    }
    tx.commit()?;
    Ok(())
}

fn current_user_version(conn: &Connection) -> RepoResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
