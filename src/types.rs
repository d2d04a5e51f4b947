// Shared data shapes for the bulk pipeline and the single-record flows.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// An album entry as the client sends it. The server assigns the id.
///
/// Only arity and year are validated when parsing rows; empty strings
/// are passed through to the server unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub owner: String,
    pub title: String,
    pub artist: String,
    pub year: i32,
}

impl Record {
    pub fn new(
        owner: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            owner: owner.into(),
            title: title.into(),
            artist: artist.into(),
            year,
        }
    }
}

/// Persisted form returned by the server. Never built locally for sending;
/// unknown fields in the response body are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: i64,
    pub owner: String,
    pub title: String,
    pub artist: String,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection, timeout or body encoding failure.
    Transport,
    /// The server answered with a non-success status.
    Status(StatusCode),
}

/// Result of one upload attempt, correlated 1:1 with an input record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        status: StatusCode,
        stored: Option<StoredRecord>,
        body: String,
    },
    Failure {
        kind: FailureKind,
        detail: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

/// Aggregate counters for a finished batch.
/// `success_count + error_count == total` always holds once built by
/// [`crate::summary::summarize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub success_count: usize,
    pub error_count: usize,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_wire_field_names() {
        let record = Record::new("Max", "Abbey Road", "The Beatles", 1969);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "owner": "Max",
                "title": "Abbey Road",
                "artist": "The Beatles",
                "year": 1969
            })
        );
    }

    #[test]
    fn stored_record_ignores_unknown_fields() {
        let body = r#"{"id":7,"owner":"Anna","title":"Rumours","artist":"Fleetwood Mac","year":1977,"created_at":"2024-01-01"}"#;
        let stored: StoredRecord = serde_json::from_str(body).unwrap();
        assert_eq!(stored.id, 7);
        assert_eq!(stored.title, "Rumours");
    }
}
