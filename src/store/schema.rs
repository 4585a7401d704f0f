use std::collections::BTreeSet;

use anyhow::{Context, Result};
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
    /// A `contacts` column that only exists once this migration is in effect.
    marker_column: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial",
        sql: include_str!("migrations/001_initial.sql"),
        marker_column: "Name",
    },
    Migration {
        version: 2,
        name: "contact_ids",
        sql: include_str!("migrations/002_contact_ids.sql"),
        marker_column: "Id",
    },
];

/// Bring the contacts file up to the latest schema.
///
/// The whole upgrade is one transaction: a migration that fails leaves the
/// file exactly as it was, with nothing recorded.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let tx = conn
        .transaction()
        .context("Failed to start schema upgrade")?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
    )
    .context("Failed to create schema_migrations table")?;

    let mut applied = applied_versions(&tx)?;

    // An untracked contacts table predates version history; record what its
    // columns already provide instead of re-running it
    if applied.is_empty() {
        let columns = contact_columns(&tx)?;
        for migration in MIGRATIONS {
            if columns.iter().any(|c| c.eq_ignore_ascii_case(migration.marker_column)) {
                record(&tx, migration)?;
                applied.insert(migration.version);
                tracing::info!(
                    "Contacts table already has migration {:03} ({})",
                    migration.version,
                    migration.name
                );
            }
        }
    }

    for migration in MIGRATIONS.iter().filter(|m| !applied.contains(&m.version)) {
        tracing::info!(
            "Applying migration {:03}: {}",
            migration.version,
            migration.name
        );
        tx.execute_batch(migration.sql).with_context(|| {
            format!(
                "Failed to apply migration {:03}: {}",
                migration.version, migration.name
            )
        })?;
        record(&tx, migration)?;
    }

    tx.commit().context("Failed to commit schema upgrade")?;
    Ok(())
}

fn applied_versions(conn: &Connection) -> Result<BTreeSet<u32>> {
    let mut stmt = conn.prepare("SELECT version FROM schema_migrations")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<BTreeSet<u32>, _>>()?;
    Ok(versions)
}

/// Column names of `contacts`, empty when the table does not exist.
fn contact_columns(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("PRAGMA table_info(contacts)")?;
    let columns = stmt
        .query_map([], |row| row.get(1))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(columns)
}

fn record(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)",
        (
            migration.version,
            migration.name,
            chrono::Utc::now().to_rfc3339(),
        ),
    )
    .with_context(|| format!("Failed to record migration {:03}", migration.version))?;
    Ok(())
}
