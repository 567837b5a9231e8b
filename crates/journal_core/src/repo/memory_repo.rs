//! In-memory entry repository.
//!
//! # Responsibility
//! - Satisfy the `EntryRepository` contract without SQLite, for tests and
//!   embedding.
//! - Count storage calls so callers can assert that a path never reached
//!   storage.
//!
//! # Invariants
//! - Ids start at 1 and are never reused, even after deletes.
//! - Insert timestamps never go below the newest `created_at` handed out.

use crate::context::RequestContext;
use crate::db::DbError;
use crate::model::entry::{EntryDraft, EntryId, JournalEntry};
use crate::repo::entry_repo::{EntryListQuery, EntryPage, EntryRepository, RepoError, RepoResult};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Default)]
struct MemoryState {
    last_id: EntryId,
    last_created_at: i64,
    rows: BTreeMap<EntryId, JournalEntry>,
}

/// Entry repository backed by a process-local map.
#[derive(Debug, Default)]
pub struct InMemoryEntryRepository {
    state: Mutex<MemoryState>,
    calls: AtomicU64,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of repository calls made so far, including failed ones.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.state.lock().map_or(0, |state| state.rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn begin(&self, ctx: &RequestContext) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if ctx.is_done() {
            return Err(RepoError::Cancelled);
        }
        self.state
            .lock()
            .map_err(|_| RepoError::Db(DbError::ConnectionPoisoned))
    }
}

impl EntryRepository for InMemoryEntryRepository {
    fn create_entry(&self, ctx: &RequestContext, draft: &EntryDraft) -> RepoResult<JournalEntry> {
        let mut state = self.begin(ctx)?;
        let stamp = now_epoch_ms().max(state.last_created_at);
        state.last_id += 1;
        state.last_created_at = stamp;

        let entry = JournalEntry {
            id: state.last_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            created_at: stamp,
            updated_at: stamp,
        };
        state.rows.insert(entry.id, entry.clone());
        Ok(entry)
    }

    fn get_entry(&self, ctx: &RequestContext, id: EntryId) -> RepoResult<JournalEntry> {
        let state = self.begin(ctx)?;
        state.rows.get(&id).cloned().ok_or(RepoError::NotFound(id))
    }

    fn update_entry(
        &self,
        ctx: &RequestContext,
        id: EntryId,
        draft: &EntryDraft,
    ) -> RepoResult<JournalEntry> {
        let mut state = self.begin(ctx)?;
        let entry = state.rows.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        entry.title = draft.title.clone();
        entry.content = draft.content.clone();
        entry.updated_at = entry.updated_at.max(now_epoch_ms());
        Ok(entry.clone())
    }

    fn delete_entry(&self, ctx: &RequestContext, id: EntryId) -> RepoResult<()> {
        let mut state = self.begin(ctx)?;
        state
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }

    fn list_entries(
        &self,
        ctx: &RequestContext,
        query: &EntryListQuery,
    ) -> RepoResult<EntryPage> {
        let state = self.begin(ctx)?;
        let mut ordered: Vec<&JournalEntry> = state.rows.values().collect();
        ordered.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let skip = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let take = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let entries = ordered
            .into_iter()
            .skip(skip)
            .take(take)
            .cloned()
            .collect();

        Ok(EntryPage {
            entries,
            total_count: state.rows.len() as u64,
        })
    }
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

#[cfg(test)]
mod tests {
    use super::InMemoryEntryRepository;
    use crate::context::RequestContext;
    use crate::model::entry::EntryDraft;
    use crate::repo::entry_repo::{EntryListQuery, EntryRepository, RepoError};

    #[test]
    fn ids_are_not_reused_after_delete() {
        let repo = InMemoryEntryRepository::new();
        let ctx = RequestContext::background();

        let first = repo.create_entry(&ctx, &EntryDraft::new("a", "1")).unwrap();
        repo.delete_entry(&ctx, first.id).unwrap();
        let second = repo.create_entry(&ctx, &EntryDraft::new("b", "2")).unwrap();

        assert!(second.id > first.id);
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn list_orders_newest_first_and_counts_everything() {
        let repo = InMemoryEntryRepository::new();
        let ctx = RequestContext::background();
        for n in 0..5 {
            repo.create_entry(&ctx, &EntryDraft::new(format!("t{n}"), "c"))
                .unwrap();
        }

        let page = repo
            .list_entries(&ctx, &EntryListQuery { limit: 2, offset: 1 })
            .unwrap();
        let ids: Vec<_> = page.entries.iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![4, 3]);
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn cancelled_context_counts_call_but_does_not_write() {
        let repo = InMemoryEntryRepository::new();
        let ctx = RequestContext::background();
        ctx.cancel();

        let err = repo
            .create_entry(&ctx, &EntryDraft::new("t", "c"))
            .unwrap_err();
        assert!(matches!(err, RepoError::Cancelled));
        assert_eq!(repo.call_count(), 1);
        assert!(repo.is_empty());
    }
}
