//! Wire-format request/response shapes.
//!
//! # Responsibility
//! - Mirror the RPC message shapes field for field (camelCase on the wire).
//! - Convert core entries into wire entries.
//!
//! # Invariants
//! - Entry ids travel as decimal text; core ids never leak as integers.
//! - Timestamps travel as `{seconds, nanos}` with `0 <= nanos < 1e9`.

use journal_core::JournalEntry;
use serde::{Deserialize, Serialize};

/// Point in time as seconds plus nanoseconds since the Unix epoch.
///
/// Same fields as `google.protobuf.Timestamp`, kept local so it derives serde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn from_epoch_ms(epoch_ms: i64) -> Self {
        let millis = epoch_ms.rem_euclid(1_000) as i32;
        Self {
            seconds: epoch_ms.div_euclid(1_000),
            nanos: millis * 1_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<JournalEntry> for WireEntry {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            title: entry.title,
            content: entry.content,
            created_at: Timestamp::from_epoch_ms(entry.created_at),
            updated_at: Timestamp::from_epoch_ms(entry.updated_at),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateEntryRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryResponse {
    pub entry: WireEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateEntryRequest {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryResponse {
    pub entry: WireEntry,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteEntryRequest {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntryResponse {
    pub success: bool,
}

/// Missing fields default to zero/empty, as proto3 scalars do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListEntriesRequest {
    pub page_size: i32,
    pub page_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesResponse {
    pub entries: Vec<WireEntry>,
    pub next_page_token: String,
    pub total_count: i32,
}

#[cfg(test)]
mod tests {
    use super::{ListEntriesRequest, Timestamp, WireEntry};
    use journal_core::JournalEntry;

    #[test]
    fn timestamp_splits_millis_into_seconds_and_nanos() {
        let ts = Timestamp::from_epoch_ms(1_700_000_000_123);
        assert_eq!(ts.seconds, 1_700_000_000);
        assert_eq!(ts.nanos, 123_000_000);
    }

    #[test]
    fn timestamp_before_epoch_keeps_nanos_positive() {
        let ts = Timestamp::from_epoch_ms(-1);
        assert_eq!(ts.seconds, -1);
        assert_eq!(ts.nanos, 999_000_000);
    }

    #[test]
    fn wire_entry_uses_text_id_and_camel_case() {
        let wire = WireEntry::from(JournalEntry {
            id: 42,
            title: "t".to_string(),
            content: "c".to_string(),
            created_at: 1_000,
            updated_at: 2_000,
        });
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["id"], "42");
        assert_eq!(json["createdAt"]["seconds"], 1);
        assert_eq!(json["updatedAt"]["seconds"], 2);
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn list_request_fields_default_when_absent() {
        let request: ListEntriesRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.page_size, 0);
        assert!(request.page_token.is_empty());

        let request: ListEntriesRequest =
            serde_json::from_str(r#"{"pageSize": 5, "pageToken": "MTA="}"#).unwrap();
        assert_eq!(request.page_size, 5);
        assert_eq!(request.page_token, "MTA=");
    }
}
