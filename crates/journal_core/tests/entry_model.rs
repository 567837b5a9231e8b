use journal_core::{EntryDraft, EntryValidationError, JournalEntry};

#[test]
fn entry_serializes_with_snake_case_fields() {
    let entry = JournalEntry {
        id: 7,
        title: "Title".to_string(),
        content: "Body".to_string(),
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_500,
    };

    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["created_at"], 1_700_000_000_000_i64);
    assert_eq!(json["updated_at"], 1_700_000_000_500_i64);

    let back: JournalEntry = serde_json::from_value(json).unwrap();
    assert_eq!(back, entry);
}

#[test]
fn validation_messages_are_human_readable() {
    assert_eq!(
        EntryDraft::new("", "x").validate().unwrap_err().to_string(),
        "title cannot be empty"
    );
    assert_eq!(
        EntryValidationError::EmptyContent.to_string(),
        "content cannot be empty"
    );
}
