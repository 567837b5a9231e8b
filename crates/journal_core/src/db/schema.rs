//! Journal store schema: upgrade and verification.
//!
//! The on-disk layout version is kept in `PRAGMA user_version`. A fresh file
//! reads as version 0; `UPGRADES[n]` moves a file from version `n` to `n + 1`.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const UPGRADES: &[&str] = &[include_str!("sql/0001_journal_entries.sql")];

/// Layout version written by this build.
pub const SCHEMA_VERSION: u32 = UPGRADES.len() as u32;

const ENTRY_TABLE: &str = "journal_entries";

/// Brings the journal store up to `SCHEMA_VERSION`.
///
/// All pending steps run in one transaction; on failure the file keeps its
/// previous layout and version.
///
/// # Errors
/// - `DbError::SchemaTooNew` when a newer build already wrote the file.
/// - `DbError::Sqlite` when an upgrade statement fails.
pub fn upgrade(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for sql in &UPGRADES[found as usize..] {
        tx.execute_batch(sql)?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    info!("event=db_upgrade module=db status=ok from_version={found} to_version={SCHEMA_VERSION}");
    Ok(())
}

/// Checks that the entry table is present.
///
/// A connection that did not go through `open_db`/`open_db_in_memory` fails
/// with `DbError::SchemaMissing`.
pub fn verify(conn: &Connection) -> DbResult<()> {
    let present: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [ENTRY_TABLE],
        |row| row.get(0),
    )?;
    if present {
        Ok(())
    } else {
        Err(DbError::SchemaMissing)
    }
}

/// Layout version recorded in the file.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
