// Sequential batch uploader. One create call at a time, in input order,
// with a fixed pause after each record. A failed record never stops the
// batch and is never retried.

use std::thread;
use std::time::Duration;

use crate::api::{RecordService, ServiceResponse};
use crate::config::PACING_MS;
use crate::errors::ClientError;
use crate::types::{FailureKind, Outcome, Record, StoredRecord};

/// Per-record progress handed to the caller right after classification.
#[derive(Debug)]
pub struct Progress<'a> {
    /// 1-based position within the batch.
    pub position: usize,
    pub total: usize,
    pub record: &'a Record,
    pub outcome: &'a Outcome,
}

pub struct BatchUploader<'s, S: RecordService + ?Sized> {
    service: &'s S,
    pacing: Duration,
}

impl<'s, S: RecordService + ?Sized> BatchUploader<'s, S> {
    pub fn new(service: &'s S) -> Self {
        Self {
            service,
            pacing: Duration::from_millis(PACING_MS),
        }
    }

    /// Pause inserted after every record. Zero disables pacing.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn upload(&self, records: &[Record]) -> Vec<Outcome> {
        self.upload_with(records, |_| {})
    }

    /// Upload every record and report each outcome through `on_outcome`
    /// before the pacing pause. Returns one outcome per record, in order.
    pub fn upload_with<F>(&self, records: &[Record], mut on_outcome: F) -> Vec<Outcome>
    where
        F: FnMut(&Progress<'_>),
    {
        let total = records.len();
        let span = tracing::info_span!("batch_upload", total);
        let _entered = span.enter();

        let mut outcomes = Vec::with_capacity(total);
        for (index, record) in records.iter().enumerate() {
            let outcome = classify(self.service.create(record));

            match &outcome {
                Outcome::Success { status, .. } => {
                    tracing::debug!(position = index + 1, title = %record.title, %status, "record created")
                }
                Outcome::Failure { kind, detail } => {
                    tracing::warn!(position = index + 1, title = %record.title, ?kind, detail = %detail, "record failed")
                }
            }

            on_outcome(&Progress {
                position: index + 1,
                total,
                record,
                outcome: &outcome,
            });
            outcomes.push(outcome);

            if !self.pacing.is_zero() {
                thread::sleep(self.pacing);
            }
        }

        tracing::info!(total, "batch finished");
        outcomes
    }
}

/// Map one create call onto an [`Outcome`].
pub fn classify(result: Result<ServiceResponse, ClientError>) -> Outcome {
    match result {
        Ok(ServiceResponse { status, body }) if status.is_success() => Outcome::Success {
            status,
            stored: serde_json::from_str::<StoredRecord>(&body).ok(),
            body,
        },
        Ok(ServiceResponse { status, .. }) => Outcome::Failure {
            kind: FailureKind::Status(status),
            detail: status.to_string(),
        },
        Err(e) => Outcome::Failure {
            kind: FailureKind::Transport,
            detail: e.to_string(),
        },
    }
}
