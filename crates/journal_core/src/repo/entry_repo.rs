//! Journal entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/update/delete/list APIs over `journal_entries`.
//! - Keep SQL details inside the core persistence boundary.
//! - Forward request cancellation into running SQLite statements.
//!
//! # Invariants
//! - Identity and timestamps are assigned by SQLite, never by callers.
//! - Insert timestamps never go below the newest stored `created_at`, so
//!   timestamp order matches insertion order.
//! - Listing order is `created_at DESC, id DESC`.
//! - Writes return the row read back inside the same transaction.
//! - Read paths reject rows where `updated_at < created_at`.

use crate::context::RequestContext;
use crate::db::{open_db, open_db_in_memory, schema, DbError};
use crate::model::entry::{EntryDraft, EntryId, JournalEntry};
use log::debug;
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, Mutex};

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    created_at,
    updated_at
FROM journal_entries";

const NOW_EPOCH_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000.0 AS INTEGER)";

/// VM instructions between two cancellation checks inside one statement.
const PROGRESS_CHECK_OPS: i32 = 1_000;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(EntryId),
    InvalidData(String),
    /// The request context was cancelled or its deadline passed.
    Cancelled,
}

impl RepoError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "journal entry not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
            Self::Cancelled => write!(f, "storage operation cancelled"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::Cancelled => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if value.sqlite_error_code() == Some(ErrorCode::OperationInterrupted) {
            return Self::Cancelled;
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Window options for listing entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryListQuery {
    /// Maximum rows to return.
    pub limit: u32,
    /// Rows to skip in listing order.
    pub offset: u64,
}

/// One listing window plus the size of the whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPage {
    pub entries: Vec<JournalEntry>,
    /// Count of all stored entries, independent of the window.
    pub total_count: u64,
}

/// Storage capability set for journal entries.
pub trait EntryRepository {
    /// Inserts an entry and returns the stored row.
    fn create_entry(&self, ctx: &RequestContext, draft: &EntryDraft) -> RepoResult<JournalEntry>;
    /// Fetches one entry; missing or deleted ids are `NotFound`.
    fn get_entry(&self, ctx: &RequestContext, id: EntryId) -> RepoResult<JournalEntry>;
    /// Replaces title and content, refreshes `updated_at`, returns the stored row.
    fn update_entry(
        &self,
        ctx: &RequestContext,
        id: EntryId,
        draft: &EntryDraft,
    ) -> RepoResult<JournalEntry>;
    /// Hard-deletes one entry.
    fn delete_entry(&self, ctx: &RequestContext, id: EntryId) -> RepoResult<()>;
    /// Returns one window in `created_at DESC, id DESC` order plus the total count.
    fn list_entries(&self, ctx: &RequestContext, query: &EntryListQuery)
        -> RepoResult<EntryPage>;
}

impl<R: EntryRepository + ?Sized> EntryRepository for &R {
    fn create_entry(&self, ctx: &RequestContext, draft: &EntryDraft) -> RepoResult<JournalEntry> {
        (**self).create_entry(ctx, draft)
    }

    fn get_entry(&self, ctx: &RequestContext, id: EntryId) -> RepoResult<JournalEntry> {
        (**self).get_entry(ctx, id)
    }

    fn update_entry(
        &self,
        ctx: &RequestContext,
        id: EntryId,
        draft: &EntryDraft,
    ) -> RepoResult<JournalEntry> {
        (**self).update_entry(ctx, id, draft)
    }

    fn delete_entry(&self, ctx: &RequestContext, id: EntryId) -> RepoResult<()> {
        (**self).delete_entry(ctx, id)
    }

    fn list_entries(
        &self,
        ctx: &RequestContext,
        query: &EntryListQuery,
    ) -> RepoResult<EntryPage> {
        (**self).list_entries(ctx, query)
    }
}

impl<R: EntryRepository + ?Sized> EntryRepository for Arc<R> {
    fn create_entry(&self, ctx: &RequestContext, draft: &EntryDraft) -> RepoResult<JournalEntry> {
        (**self).create_entry(ctx, draft)
    }

    fn get_entry(&self, ctx: &RequestContext, id: EntryId) -> RepoResult<JournalEntry> {
        (**self).get_entry(ctx, id)
    }

    fn update_entry(
        &self,
        ctx: &RequestContext,
        id: EntryId,
        draft: &EntryDraft,
    ) -> RepoResult<JournalEntry> {
        (**self).update_entry(ctx, id, draft)
    }

    fn delete_entry(&self, ctx: &RequestContext, id: EntryId) -> RepoResult<()> {
        (**self).delete_entry(ctx, id)
    }

    fn list_entries(
        &self,
        ctx: &RequestContext,
        query: &EntryListQuery,
    ) -> RepoResult<EntryPage> {
        (**self).list_entries(ctx, query)
    }
}

/// SQLite-backed entry repository.
///
/// Owns a single connection. The mutex only hands that connection to one
/// request at a time; write ordering and cross-process locking are left to
/// SQLite.
pub struct SqliteEntryRepository {
    conn: Mutex<Connection>,
}

impl SqliteEntryRepository {
    /// Wraps a migrated connection.
    ///
    /// Fails with `DbError::SchemaMissing` when the connection did not come
    /// from `open_db`/`open_db_in_memory`.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        schema::verify(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Runs `work` on the connection with cancellation wired in.
    fn with_conn<T>(
        &self,
        ctx: &RequestContext,
        op: &'static str,
        work: impl FnOnce(&Connection) -> RepoResult<T>,
    ) -> RepoResult<T> {
        if ctx.is_done() {
            debug!("event=repo_op module=repo status=cancelled op={op} stage=before_lock");
            return Err(RepoError::Cancelled);
        }

        let conn = self
            .conn
            .lock()
            .map_err(|_| RepoError::Db(DbError::ConnectionPoisoned))?;

        // The lock wait may have outlived the caller.
        if ctx.is_done() {
            debug!("event=repo_op module=repo status=cancelled op={op} stage=after_lock");
            return Err(RepoError::Cancelled);
        }

        let watched = ctx.clone();
        conn.progress_handler(PROGRESS_CHECK_OPS, Some(move || watched.is_done()));
        let result = work(&conn);
        conn.progress_handler(0, None::<fn() -> bool>);

        if let Err(err) = &result {
            if !err.is_not_found() {
                debug!("event=repo_op module=repo status=error op={op} error={err}");
            }
        }
        result
    }
}

impl EntryRepository for SqliteEntryRepository {
    fn create_entry(&self, ctx: &RequestContext, draft: &EntryDraft) -> RepoResult<JournalEntry> {
        self.with_conn(ctx, "create", |conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                &format!(
                    "INSERT INTO journal_entries (title, content, created_at, updated_at)
                     SELECT ?1, ?2, stamp, stamp
                     FROM (
                        SELECT MAX(
                            {NOW_EPOCH_MS_SQL},
                            COALESCE((SELECT MAX(created_at) FROM journal_entries), 0)
                        ) AS stamp
                     );"
                ),
                params![draft.title.as_str(), draft.content.as_str()],
            )?;

            let id = tx.last_insert_rowid();
            let entry = fetch_entry(&tx, id)?.ok_or_else(|| {
                RepoError::InvalidData(format!("created entry {id} missing in read-back"))
            })?;
            tx.commit()?;
            Ok(entry)
        })
    }

    fn get_entry(&self, ctx: &RequestContext, id: EntryId) -> RepoResult<JournalEntry> {
        self.with_conn(ctx, "get", |conn| {
            fetch_entry(conn, id)?.ok_or(RepoError::NotFound(id))
        })
    }

    fn update_entry(
        &self,
        ctx: &RequestContext,
        id: EntryId,
        draft: &EntryDraft,
    ) -> RepoResult<JournalEntry> {
        self.with_conn(ctx, "update", |conn| {
            let tx = conn.unchecked_transaction()?;
            let changed = tx.execute(
                &format!(
                    "UPDATE journal_entries
                     SET
                        title = ?2,
                        content = ?3,
                        updated_at = MAX(updated_at, {NOW_EPOCH_MS_SQL})
                     WHERE id = ?1;"
                ),
                params![id, draft.title.as_str(), draft.content.as_str()],
            )?;

            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }

            let entry = fetch_entry(&tx, id)?.ok_or_else(|| {
                RepoError::InvalidData(format!("updated entry {id} missing in read-back"))
            })?;
            tx.commit()?;
            Ok(entry)
        })
    }

    fn delete_entry(&self, ctx: &RequestContext, id: EntryId) -> RepoResult<()> {
        self.with_conn(ctx, "delete", |conn| {
            let changed = conn.execute("DELETE FROM journal_entries WHERE id = ?1;", [id])?;
            if changed == 0 {
                return Err(RepoError::NotFound(id));
            }
            Ok(())
        })
    }

    fn list_entries(
        &self,
        ctx: &RequestContext,
        query: &EntryListQuery,
    ) -> RepoResult<EntryPage> {
        let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);

        self.with_conn(ctx, "list", |conn| {
            // Count and window share one snapshot.
            let tx = conn.unchecked_transaction()?;
            let total: i64 =
                tx.query_row("SELECT COUNT(*) FROM journal_entries;", [], |row| row.get(0))?;
            let total_count = u64::try_from(total)
                .map_err(|_| RepoError::InvalidData(format!("negative row count {total}")))?;

            let mut entries = Vec::new();
            {
                let mut stmt = tx.prepare(&format!(
                    "{ENTRY_SELECT_SQL}
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?1 OFFSET ?2;"
                ))?;
                let mut rows = stmt.query(params![i64::from(query.limit), offset])?;
                while let Some(row) = rows.next()? {
                    entries.push(parse_entry_row(row)?);
                }
            }
            tx.commit()?;

            Ok(EntryPage {
                entries,
                total_count,
            })
        })
    }
}

fn fetch_entry(conn: &Connection, id: EntryId) -> RepoResult<Option<JournalEntry>> {
    let mut stmt = conn.prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(parse_entry_row(row)?)),
        None => Ok(None),
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<JournalEntry> {
    let entry = JournalEntry {
        id: row.get("id")?,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };

    if entry.updated_at < entry.created_at {
        return Err(RepoError::InvalidData(format!(
            "entry {} has updated_at {} earlier than created_at {}",
            entry.id, entry.updated_at, entry.created_at
        )));
    }

    Ok(entry)
}

