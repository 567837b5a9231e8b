//! RPC handler for the journal service.
//!
//! # Responsibility
//! - Expose the four journal operations with wire request/response shapes.
//! - Parse wire ids before the manager is involved.
//! - Translate manager failures into wire statuses.
//!
//! # Invariants
//! - Holds no state beyond the manager; no business rules live here.
//! - A malformed id is rejected with `InvalidArgument` and never reaches the
//!   manager or storage.
//! - Failures never produce partially filled responses.

use crate::status::Status;
use crate::wire::{
    CreateEntryRequest, CreateEntryResponse, DeleteEntryRequest, DeleteEntryResponse,
    ListEntriesRequest, ListEntriesResponse, UpdateEntryRequest, UpdateEntryResponse, WireEntry,
};
use journal_core::{EntryId, EntryManager, EntryRepository, ManagerError, RequestContext};
use log::{info, warn};

/// Journal RPC service over an entry repository.
pub struct JournalService<R: EntryRepository> {
    manager: EntryManager<R>,
}

impl<R: EntryRepository> JournalService<R> {
    pub fn new(manager: EntryManager<R>) -> Self {
        Self { manager }
    }

    /// Builds the manager and service over `repo` in one step.
    pub fn with_repository(repo: R) -> Self {
        Self::new(EntryManager::new(repo))
    }

    pub fn create_entry(
        &self,
        ctx: &RequestContext,
        request: CreateEntryRequest,
    ) -> Result<CreateEntryResponse, Status> {
        info!("event=rpc_call module=rpc method=CreateEntry");

        let entry = self
            .manager
            .create_entry(ctx, request.title, request.content)
            .map_err(|err| rpc_failure("CreateEntry", "create entry", &err))?;

        Ok(CreateEntryResponse {
            entry: WireEntry::from(entry),
        })
    }

    pub fn update_entry(
        &self,
        ctx: &RequestContext,
        request: UpdateEntryRequest,
    ) -> Result<UpdateEntryResponse, Status> {
        info!(
            "event=rpc_call module=rpc method=UpdateEntry entry_id={}",
            request.id
        );

        let id = parse_entry_id(&request.id)?;
        let entry = self
            .manager
            .update_entry(ctx, id, request.title, request.content)
            .map_err(|err| rpc_failure("UpdateEntry", "update entry", &err))?;

        Ok(UpdateEntryResponse {
            entry: WireEntry::from(entry),
        })
    }

    pub fn delete_entry(
        &self,
        ctx: &RequestContext,
        request: DeleteEntryRequest,
    ) -> Result<DeleteEntryResponse, Status> {
        info!(
            "event=rpc_call module=rpc method=DeleteEntry entry_id={}",
            request.id
        );

        let id = parse_entry_id(&request.id)?;
        self.manager
            .delete_entry(ctx, id)
            .map_err(|err| rpc_failure("DeleteEntry", "delete entry", &err))?;

        Ok(DeleteEntryResponse { success: true })
    }

    pub fn list_entries(
        &self,
        ctx: &RequestContext,
        request: ListEntriesRequest,
    ) -> Result<ListEntriesResponse, Status> {
        info!(
            "event=rpc_call module=rpc method=ListEntries page_size={} has_page_token={}",
            request.page_size,
            !request.page_token.is_empty()
        );

        let result = self
            .manager
            .list_entries(ctx, request.page_size, &request.page_token)
            .map_err(|err| rpc_failure("ListEntries", "list entries", &err))?;

        Ok(ListEntriesResponse {
            entries: result.entries.into_iter().map(WireEntry::from).collect(),
            next_page_token: result.next_page_token,
            total_count: i32::try_from(result.total_count).unwrap_or(i32::MAX),
        })
    }
}

/// Parses a wire id into the storage id type.
pub fn parse_entry_id(raw: &str) -> Result<EntryId, Status> {
    raw.parse::<EntryId>().map_err(|err| {
        warn!("event=rpc_reject module=rpc reason=malformed_id");
        Status::invalid_argument(format!("invalid entry ID `{raw}`: {err}"))
    })
}

fn rpc_failure(method: &str, action: &str, err: &ManagerError) -> Status {
    let status = Status::from_manager_error(action, err);
    warn!(
        "event=rpc_call module=rpc method={method} status=error code={:?} error={err}",
        status.code
    );
    status
}

#[cfg(test)]
mod tests {
    use super::{parse_entry_id, JournalService};
    use crate::wire::{
        CreateEntryRequest, DeleteEntryRequest, ListEntriesRequest, UpdateEntryRequest,
    };
    use journal_core::{InMemoryEntryRepository, RequestContext, SqliteEntryRepository};
    use tonic::Code;

    fn create(service: &JournalService<impl journal_core::EntryRepository>, title: &str) -> String {
        service
            .create_entry(
                &RequestContext::background(),
                CreateEntryRequest {
                    title: title.to_string(),
                    content: format!("{title} body"),
                },
            )
            .unwrap()
            .entry
            .id
    }

    #[test]
    fn parse_entry_id_accepts_decimal_text_only() {
        assert_eq!(parse_entry_id("42").unwrap(), 42);
        for raw in ["", "abc", "4.2", "0x10", "99999999999999999999"] {
            let status = parse_entry_id(raw).unwrap_err();
            assert_eq!(status.code, Code::InvalidArgument, "{raw}");
        }
    }

    #[test]
    fn malformed_id_never_reaches_storage() {
        let repo = InMemoryEntryRepository::new();
        let service = JournalService::with_repository(&repo);
        let ctx = RequestContext::background();

        let update = service
            .update_entry(
                &ctx,
                UpdateEntryRequest {
                    id: "not-a-number".to_string(),
                    title: "t".to_string(),
                    content: "c".to_string(),
                },
            )
            .unwrap_err();
        let delete = service
            .delete_entry(
                &ctx,
                DeleteEntryRequest {
                    id: "12abc".to_string(),
                },
            )
            .unwrap_err();

        assert_eq!(update.code, Code::InvalidArgument);
        assert_eq!(delete.code, Code::InvalidArgument);
        assert_eq!(repo.call_count(), 0);
    }

    #[test]
    fn create_returns_wire_entry() {
        let service =
            JournalService::with_repository(SqliteEntryRepository::open_in_memory().unwrap());
        let response = service
            .create_entry(
                &RequestContext::background(),
                CreateEntryRequest {
                    title: "Hello".to_string(),
                    content: "World".to_string(),
                },
            )
            .unwrap();

        assert_eq!(response.entry.id, "1");
        assert_eq!(response.entry.title, "Hello");
        assert_eq!(response.entry.content, "World");
        assert_eq!(response.entry.created_at, response.entry.updated_at);
    }

    #[test]
    fn empty_title_is_invalid_argument() {
        let service = JournalService::with_repository(InMemoryEntryRepository::new());
        let status = service
            .create_entry(
                &RequestContext::background(),
                CreateEntryRequest {
                    title: String::new(),
                    content: "body".to_string(),
                },
            )
            .unwrap_err();

        assert_eq!(status.code, Code::InvalidArgument);
        assert!(status.message.contains("title cannot be empty"));
    }

    #[test]
    fn missing_entry_is_not_found_for_update_and_delete() {
        let service = JournalService::with_repository(InMemoryEntryRepository::new());
        let ctx = RequestContext::background();

        let update = service
            .update_entry(
                &ctx,
                UpdateEntryRequest {
                    id: "5".to_string(),
                    title: "t".to_string(),
                    content: "c".to_string(),
                },
            )
            .unwrap_err();
        let delete = service
            .delete_entry(&ctx, DeleteEntryRequest { id: "5".to_string() })
            .unwrap_err();

        assert_eq!(update.code, Code::NotFound);
        assert_eq!(delete.code, Code::NotFound);
    }

    #[test]
    fn update_then_delete_roundtrip() {
        let service = JournalService::with_repository(InMemoryEntryRepository::new());
        let ctx = RequestContext::background();
        let id = create(&service, "draft");

        let updated = service
            .update_entry(
                &ctx,
                UpdateEntryRequest {
                    id: id.clone(),
                    title: "final".to_string(),
                    content: "done".to_string(),
                },
            )
            .unwrap();
        assert_eq!(updated.entry.id, id);
        assert_eq!(updated.entry.title, "final");

        let deleted = service
            .delete_entry(&ctx, DeleteEntryRequest { id: id.clone() })
            .unwrap();
        assert!(deleted.success);

        let again = service
            .delete_entry(&ctx, DeleteEntryRequest { id })
            .unwrap_err();
        assert_eq!(again.code, Code::NotFound);
    }

    #[test]
    fn list_follows_tokens_through_twenty_five_entries() {
        let service =
            JournalService::with_repository(SqliteEntryRepository::open_in_memory().unwrap());
        let ctx = RequestContext::background();
        for n in 0..25 {
            create(&service, &format!("entry {n}"));
        }

        let mut sizes = Vec::new();
        let mut token = String::new();
        loop {
            let page = service
                .list_entries(
                    &ctx,
                    ListEntriesRequest {
                        page_size: 10,
                        page_token: token,
                    },
                )
                .unwrap();
            assert_eq!(page.total_count, 25);
            sizes.push(page.entries.len());
            if page.next_page_token.is_empty() {
                break;
            }
            token = page.next_page_token;
        }

        assert_eq!(sizes, vec![10, 10, 5]);
    }

    #[test]
    fn list_newest_entry_comes_first() {
        let service = JournalService::with_repository(InMemoryEntryRepository::new());
        create(&service, "older");
        let newest = create(&service, "newer");

        let page = service
            .list_entries(&RequestContext::background(), ListEntriesRequest::default())
            .unwrap();
        assert_eq!(page.entries[0].id, newest);
        assert_eq!(page.entries[1].title, "older");
    }

    #[test]
    fn bad_page_token_is_invalid_argument() {
        let service = JournalService::with_repository(InMemoryEntryRepository::new());
        let status = service
            .list_entries(
                &RequestContext::background(),
                ListEntriesRequest {
                    page_size: 10,
                    page_token: "!!".to_string(),
                },
            )
            .unwrap_err();
        assert_eq!(status.code, Code::InvalidArgument);
        assert!(status.message.contains("invalid page token"));
    }

    #[test]
    fn cancelled_request_maps_to_cancelled() {
        let service = JournalService::with_repository(InMemoryEntryRepository::new());
        let ctx = RequestContext::background();
        ctx.cancel();

        let status = service
            .list_entries(&ctx, ListEntriesRequest::default())
            .unwrap_err();
        assert_eq!(status.code, Code::Cancelled);
    }
}
