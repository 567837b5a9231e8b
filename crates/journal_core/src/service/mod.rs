//! Core use-case services.
//!
//! # Responsibility
//! - Enforce write-input rules before storage is reached.
//! - Translate page-size/page-token requests into storage windows.
//! - Keep RPC/CLI layers decoupled from storage details.

pub mod entry_manager;
pub mod page_token;
