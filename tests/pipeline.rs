use std::cell::RefCell;
use std::time::Duration;

use record_cli::api::{ApiClient, RecordService, ServiceResponse};
use record_cli::config::ApiConfig;
use record_cli::errors::ClientError;
use record_cli::parser::{parse_lines, RowIssue};
use record_cli::summary::summarize;
use record_cli::types::{BatchReport, FailureKind, Record};
use record_cli::upload::BatchUploader;
use reqwest::StatusCode;

/// Accepts every record and echoes it back with a fresh id.
#[derive(Default)]
struct AcceptAll {
    created: RefCell<Vec<Record>>,
}

impl RecordService for AcceptAll {
    fn create(&self, record: &Record) -> Result<ServiceResponse, ClientError> {
        let mut created = self.created.borrow_mut();
        created.push(record.clone());
        let body = serde_json::json!({
            "id": created.len(),
            "owner": record.owner,
            "title": record.title,
            "artist": record.artist,
            "year": record.year,
        });
        Ok(ServiceResponse {
            status: StatusCode::CREATED,
            body: body.to_string(),
        })
    }

    fn get(&self, _id: i64) -> Result<ServiceResponse, ClientError> {
        unimplemented!()
    }

    fn list(&self) -> Result<ServiceResponse, ClientError> {
        unimplemented!()
    }

    fn update(&self, _id: i64, _record: &Record, _owner: &str) -> Result<ServiceResponse, ClientError> {
        unimplemented!()
    }

    fn delete(&self, _id: i64, _owner: &str) -> Result<ServiceResponse, ClientError> {
        unimplemented!()
    }
}

#[test]
fn parse_upload_and_summarize() {
    let lines = [
        "owner,title,artist,year",
        "\"Max\",\"Abbey Road\",\"Beatles\",1969",
        "bad,row",
    ];

    let parsed = parse_lines(lines);
    assert_eq!(parsed.records, vec![Record::new("Max", "Abbey Road", "Beatles", 1969)]);
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(parsed.warnings[0].line, 3);
    assert_eq!(parsed.warnings[0].issue, RowIssue::TooFewColumns { found: 2 });

    let service = AcceptAll::default();
    let outcomes = BatchUploader::new(&service)
        .with_pacing(Duration::ZERO)
        .upload(&parsed.records);

    assert_eq!(
        summarize(&outcomes),
        BatchReport {
            success_count: 1,
            error_count: 0,
            total: 1
        }
    );
    assert_eq!(service.created.borrow().len(), 1);
}

#[test]
fn unreachable_api_fails_every_record_without_aborting() {
    let api = ApiClient::new(&ApiConfig {
        base_url: url::Url::parse("http://127.0.0.1:9/").unwrap(),
        timeout: Duration::from_millis(500),
        connect_timeout: Duration::from_millis(200),
    })
    .unwrap();

    let records = record_cli::source::sample_records();
    let batch = &records[..3];
    let outcomes = BatchUploader::new(&api)
        .with_pacing(Duration::from_millis(1))
        .upload(batch);

    assert_eq!(outcomes.len(), 3);
    for outcome in &outcomes {
        assert!(matches!(
            outcome,
            record_cli::types::Outcome::Failure {
                kind: FailureKind::Transport,
                ..
            }
        ));
    }

    let report = summarize(&outcomes);
    assert_eq!(report.error_count, 3);
    assert_eq!(report.success_count + report.error_count, report.total);
}
