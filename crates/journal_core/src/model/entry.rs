//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the persisted entry shape and the validated write input.
//!
//! # Invariants
//! - `id` is assigned by storage and never mutated.
//! - `updated_at >= created_at` for every persisted entry.
//! - `title` and `content` are non-empty for every persisted entry; this is
//!   checked by `EntryDraft::validate()` before storage is reached.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage identity of a journal entry.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntryId = i64;

/// Canonical journal record as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Auto-incremented identity, strictly increasing in creation order.
    pub id: EntryId,
    pub title: String,
    pub content: String,
    /// Unix epoch milliseconds, set once at insert.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every successful update.
    pub updated_at: i64,
}

/// Caller-supplied text for create and update writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub title: String,
    pub content: String,
}

impl EntryDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Checks write-input invariants.
    ///
    /// Title is checked before content, so a draft with both fields empty
    /// reports `EmptyTitle`.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.title.is_empty() {
            return Err(EntryValidationError::EmptyTitle);
        }
        if self.content.is_empty() {
            return Err(EntryValidationError::EmptyContent);
        }
        Ok(())
    }
}

/// Validation failure for caller-supplied entry text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyTitle,
    EmptyContent,
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::EmptyContent => write!(f, "content cannot be empty"),
        }
    }
}

impl Error for EntryValidationError {}

#[cfg(test)]
mod tests {
    use super::{EntryDraft, EntryValidationError};

    #[test]
    fn validate_accepts_non_empty_fields() {
        assert_eq!(EntryDraft::new("t", "c").validate(), Ok(()));
    }

    #[test]
    fn validate_checks_title_before_content() {
        assert_eq!(
            EntryDraft::new("", "").validate(),
            Err(EntryValidationError::EmptyTitle)
        );
        assert_eq!(
            EntryDraft::new("title", "").validate(),
            Err(EntryValidationError::EmptyContent)
        );
    }

    #[test]
    fn whitespace_only_text_is_not_empty() {
        assert_eq!(EntryDraft::new(" ", "\n").validate(), Ok(()));
    }
}
