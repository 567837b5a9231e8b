//! SQLite access for the journal store.
//!
//! `open_db`/`open_db_in_memory` are the only way to get a connection that
//! repositories accept: both set the busy timeout and run `schema::upgrade`
//! before returning.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a build with a newer layout.
    SchemaTooNew { found: u32, supported: u32 },
    /// The connection has no `journal_entries` table.
    SchemaMissing,
    /// A previous holder of the connection lock panicked mid-operation.
    ConnectionPoisoned,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "journal file has layout version {found}; this build reads up to {supported}"
            ),
            Self::SchemaMissing => write!(
                f,
                "journal_entries table is missing; open the database through db::open_db"
            ),
            Self::ConnectionPoisoned => write!(f, "database connection lock is poisoned"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
