//! Core domain logic for the micro journal.
//! This crate is the single source of truth for entry invariants and
//! pagination rules.

pub mod context;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use context::RequestContext;
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig};
pub use model::entry::{EntryDraft, EntryId, EntryValidationError, JournalEntry};
pub use repo::entry_repo::{
    EntryListQuery, EntryPage, EntryRepository, RepoError, RepoResult, SqliteEntryRepository,
};
pub use repo::memory_repo::InMemoryEntryRepository;
pub use service::entry_manager::{EntryManager, ListEntriesResult, ManagerError, ManagerResult};
pub use service::page_token::{
    decode_page_token, encode_page_token, normalize_page_size, PageTokenError,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
