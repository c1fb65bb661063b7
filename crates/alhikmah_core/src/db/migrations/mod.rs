//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema migrations in strictly increasing order.
//! - Apply pending migrations atomically.
//! - Reset the schema when the on-disk version cannot be migrated and the
//!   caller opted into destructive fallback.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::warn;
use rusqlite::{Connection, Transaction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// What to do when the database schema is newer than this binary knows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationPolicy {
    /// Refuse to open with [`DbError::UnsupportedSchemaVersion`].
    #[default]
    Strict,
    /// Drop every table and rebuild the schema from scratch. Data is lost.
    DestructiveFallback,
}

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection, policy: MigrationPolicy) -> DbResult<()> {
    let mut current_version = current_user_version(conn)?;
    let latest = latest_version();

    let tx = conn.transaction()?;

    if current_version > latest {
        match policy {
            MigrationPolicy::Strict => {
                return Err(DbError::UnsupportedSchemaVersion {
                    db_version: current_version,
                    latest_supported: latest,
                });
            }
            MigrationPolicy::DestructiveFallback => {
                warn!(
                    "event=db_migrate module=db status=reset db_version={} latest_supported={}",
                    current_version, latest
                );
                drop_all_tables(&tx)?;
                current_version = 0;
            }
        }
    }

    if current_version == latest {
        tx.commit()?;
        return Ok(());
    }

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn drop_all_tables(tx: &Transaction<'_>) -> DbResult<()> {
    let names = {
        let mut stmt = tx.prepare(
            "SELECT name
             FROM sqlite_master
             WHERE type = 'table'
               AND name NOT LIKE 'sqlite_%';",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    for name in names {
        tx.execute_batch(&format!("DROP TABLE IF EXISTS \"{}\";", name.replace('"', "\"\"")))?;
    }
    tx.execute_batch("PRAGMA user_version = 0;")?;
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
