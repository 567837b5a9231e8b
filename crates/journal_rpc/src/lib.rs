//! RPC-facing layer for the micro journal.
//!
//! Transport is left to the embedder: every request and response shape is a
//! serde type, and `JournalService` is a plain synchronous handler.

pub mod api;
pub mod status;
pub mod wire;

pub use api::{parse_entry_id, JournalService};
pub use status::Status;
pub use tonic::Code;
pub use wire::{
    CreateEntryRequest, CreateEntryResponse, DeleteEntryRequest, DeleteEntryResponse,
    ListEntriesRequest, ListEntriesResponse, Timestamp, UpdateEntryRequest, UpdateEntryResponse,
    WireEntry,
};
