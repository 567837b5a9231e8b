//! Wire status codes and domain-error translation.
//!
//! # Invariants
//! - Every domain error maps to exactly one `tonic::Code`, independent of the
//!   operation that produced it.
//! - Status messages are human-readable and never empty.
//! - On the JSON wire `code` is the numeric gRPC value, as in `google.rpc.Status`.

use journal_core::{ManagerError, RepoError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use tonic::Code;

/// Failed RPC outcome: a code plus a display message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(with = "numeric_code")]
    pub code: Code,
    pub message: String,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    /// Status for a manager failure, prefixed with what was being attempted.
    pub fn from_manager_error(action: &str, err: &ManagerError) -> Self {
        let code = match err {
            ManagerError::Validation(_) | ManagerError::InvalidPageToken(_) => {
                Code::InvalidArgument
            }
            ManagerError::NotFound(_) => Code::NotFound,
            ManagerError::Storage(RepoError::Cancelled) => Code::Cancelled,
            ManagerError::Storage(_) => Code::Internal,
        };
        Self::new(code, format!("failed to {action}: {err}"))
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for Status {}

impl From<Status> for tonic::Status {
    fn from(value: Status) -> Self {
        tonic::Status::new(value.code, value.message)
    }
}

mod numeric_code {
    use serde::{Deserialize, Deserializer, Serializer};
    use tonic::Code;

    pub fn serialize<S: Serializer>(code: &Code, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(i32::from(*code))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Code, D::Error> {
        i32::deserialize(deserializer).map(Code::from_i32)
    }
}

#[cfg(test)]
mod tests {
    use super::Status;
    use journal_core::db::DbError;
    use journal_core::{EntryValidationError, ManagerError, PageTokenError, RepoError};
    use tonic::Code;

    #[test]
    fn each_error_kind_has_one_code() {
        let cases = [
            (
                ManagerError::Validation(EntryValidationError::EmptyTitle),
                Code::InvalidArgument,
            ),
            (
                ManagerError::InvalidPageToken(PageTokenError::NotUtf8),
                Code::InvalidArgument,
            ),
            (ManagerError::NotFound(3), Code::NotFound),
            (ManagerError::Storage(RepoError::Cancelled), Code::Cancelled),
            (
                ManagerError::Storage(RepoError::Db(DbError::ConnectionPoisoned)),
                Code::Internal,
            ),
        ];

        for (err, expected) in cases {
            let status = Status::from_manager_error("do thing", &err);
            assert_eq!(status.code, expected, "{err}");
            assert!(status.message.starts_with("failed to do thing: "));
        }
    }

    #[test]
    fn code_travels_as_grpc_number() {
        let json = serde_json::to_string(&Status::new(Code::NotFound, "missing")).unwrap();
        assert_eq!(json, r#"{"code":5,"message":"missing"}"#);

        let back: Status = serde_json::from_str(r#"{"code":1,"message":"stop"}"#).unwrap();
        assert_eq!(back.code, Code::Cancelled);
    }

    #[test]
    fn converts_into_tonic_status() {
        let status: tonic::Status = Status::invalid_argument("bad id").into();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "bad id");
    }
}
