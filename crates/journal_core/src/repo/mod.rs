//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage capability set the entry manager depends on.
//! - Isolate SQLite query details from business orchestration.
//!
//! # Invariants
//! - Repositories do not re-validate entry text; callers validate first.
//! - Repository APIs report `NotFound` separately from storage failures.
//! - Zero affected rows on update/delete is `NotFound`, never success.

pub mod entry_repo;
pub mod memory_repo;
