//! Journal entry manager.
//!
//! # Responsibility
//! - Validate caller-supplied entry text.
//! - Own pagination math between page tokens and storage offsets.
//! - Delegate persistence to an `EntryRepository` implementation.
//!
//! # Invariants
//! - Validation and token failures never reach the repository.
//! - Repository `NotFound` surfaces as `ManagerError::NotFound`; every other
//!   repository failure surfaces as `ManagerError::Storage`.
//! - No retries and no caching; each call maps to repository calls 1:1.

use crate::context::RequestContext;
use crate::model::entry::{EntryDraft, EntryId, EntryValidationError, JournalEntry};
use crate::repo::entry_repo::{EntryListQuery, EntryRepository, RepoError};
use crate::service::page_token::{
    decode_page_token, next_page_token, normalize_page_size, PageTokenError,
};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Manager error for entry use-cases.
#[derive(Debug)]
pub enum ManagerError {
    /// Title or content is empty.
    Validation(EntryValidationError),
    /// Page token is not a base-64 encoded non-negative offset.
    InvalidPageToken(PageTokenError),
    /// Target entry does not exist.
    NotFound(EntryId),
    /// Persistence-layer failure, cancellation included.
    Storage(RepoError),
}

impl ManagerError {
    /// Returns whether the failure came from the request context.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Storage(RepoError::Cancelled))
    }
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidPageToken(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "journal entry not found: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::InvalidPageToken(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<EntryValidationError> for ManagerError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PageTokenError> for ManagerError {
    fn from(value: PageTokenError) -> Self {
        Self::InvalidPageToken(value)
    }
}

impl From<RepoError> for ManagerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;

/// One page of entries plus the continuation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntriesResult {
    /// Entries in `created_at DESC, id DESC` order.
    pub entries: Vec<JournalEntry>,
    /// Empty when no entries remain after this page.
    pub next_page_token: String,
    /// Count of all stored entries.
    pub total_count: u64,
}

/// Business-rule layer over an entry repository.
pub struct EntryManager<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryManager<R> {
    /// Creates a manager using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one entry.
    ///
    /// # Errors
    /// - `Validation` when title or content is empty.
    /// - `Storage` when persistence fails.
    pub fn create_entry(
        &self,
        ctx: &RequestContext,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> ManagerResult<JournalEntry> {
        let draft = EntryDraft::new(title, content);
        draft.validate()?;

        let entry = self.repo.create_entry(ctx, &draft)?;
        debug!(
            "event=entry_create module=service status=ok entry_id={}",
            entry.id
        );
        Ok(entry)
    }

    /// Gets one entry by id.
    pub fn get_entry(&self, ctx: &RequestContext, id: EntryId) -> ManagerResult<JournalEntry> {
        Ok(self.repo.get_entry(ctx, id)?)
    }

    /// Replaces title and content of an existing entry.
    ///
    /// Validation runs before the repository is called, so an invalid update
    /// of a missing id reports `Validation`, not `NotFound`.
    pub fn update_entry(
        &self,
        ctx: &RequestContext,
        id: EntryId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> ManagerResult<JournalEntry> {
        let draft = EntryDraft::new(title, content);
        draft.validate()?;

        let entry = self.repo.update_entry(ctx, id, &draft)?;
        debug!("event=entry_update module=service status=ok entry_id={id}");
        Ok(entry)
    }

    /// Hard-deletes one entry.
    pub fn delete_entry(&self, ctx: &RequestContext, id: EntryId) -> ManagerResult<()> {
        self.repo.delete_entry(ctx, id)?;
        debug!("event=entry_delete module=service status=ok entry_id={id}");
        Ok(())
    }

    /// Lists one page of entries, newest first.
    ///
    /// # Contract
    /// - `page_size` is clamped to `1..=100`, with `<= 0` meaning 10.
    /// - An empty `page_token` starts at offset 0.
    /// - `next_page_token` is empty once `offset + returned >= total_count`.
    ///
    /// # Errors
    /// - `InvalidPageToken` for malformed tokens, before any storage call.
    /// - `Storage` when persistence fails.
    pub fn list_entries(
        &self,
        ctx: &RequestContext,
        page_size: i32,
        page_token: &str,
    ) -> ManagerResult<ListEntriesResult> {
        let limit = normalize_page_size(page_size);
        let offset = decode_page_token(page_token).inspect_err(|err| {
            warn!("event=entry_list module=service status=rejected reason=page_token error={err}");
        })?;

        let page = self
            .repo
            .list_entries(ctx, &EntryListQuery { limit, offset })?;
        let next_page_token = next_page_token(offset, page.entries.len(), page.total_count);

        debug!(
            "event=entry_list module=service status=ok limit={limit} offset={offset} returned={} total={}",
            page.entries.len(),
            page.total_count
        );

        Ok(ListEntriesResult {
            entries: page.entries,
            next_page_token,
            total_count: page.total_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryManager, ManagerError};
    use crate::context::RequestContext;
    use crate::model::entry::EntryValidationError;
    use crate::repo::memory_repo::InMemoryEntryRepository;

    #[test]
    fn empty_fields_never_reach_repository() {
        let repo = InMemoryEntryRepository::new();
        let manager = EntryManager::new(&repo);
        let ctx = RequestContext::background();

        let err = manager.create_entry(&ctx, "", "body").unwrap_err();
        assert!(matches!(
            err,
            ManagerError::Validation(EntryValidationError::EmptyTitle)
        ));
        let err = manager.update_entry(&ctx, 7, "title", "").unwrap_err();
        assert!(matches!(
            err,
            ManagerError::Validation(EntryValidationError::EmptyContent)
        ));
        assert_eq!(repo.call_count(), 0);
    }

    #[test]
    fn not_found_is_lifted_from_repository() {
        let manager = EntryManager::new(InMemoryEntryRepository::new());
        let ctx = RequestContext::background();

        assert!(matches!(
            manager.delete_entry(&ctx, 42),
            Err(ManagerError::NotFound(42))
        ));
    }

    #[test]
    fn cancellation_surfaces_as_storage_error() {
        let manager = EntryManager::new(InMemoryEntryRepository::new());
        let ctx = RequestContext::background();
        ctx.cancel();

        let err = manager.list_entries(&ctx, 10, "").unwrap_err();
        assert!(err.is_cancelled());
    }
}
