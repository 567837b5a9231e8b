//! Journal domain model.
//!
//! # Responsibility
//! - Define the canonical entry record shared by repository, manager and RPC
//!   layers.
//! - Own field validation rules for caller-supplied entry text.
//!
//! # Invariants
//! - Every entry is identified by a storage-assigned `EntryId` that is never
//!   reused.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod entry;
