// API client module: the `RecordService` capability the rest of the crate
// talks to, and a small blocking HTTP implementation of it against the
// record API (`/records` and `/records/{id}`).

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::StatusCode;
use url::Url;

use crate::config::ApiConfig;
use crate::errors::ClientError;
use crate::types::Record;

/// Status and raw body of one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Operations the client needs from the record API. `Err` means the call
/// never produced a response (connection, timeout, encoding).
pub trait RecordService {
    fn create(&self, record: &Record) -> Result<ServiceResponse, ClientError>;
    fn get(&self, id: i64) -> Result<ServiceResponse, ClientError>;
    fn list(&self) -> Result<ServiceResponse, ClientError>;
    fn update(&self, id: i64, record: &Record, owner: &str) -> Result<ServiceResponse, ClientError>;
    fn delete(&self, id: i64, owner: &str) -> Result<ServiceResponse, ClientError>;
}

/// Recognised results of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStatus {
    Updated,
    NotFound,
    Forbidden,
    Unexpected(StatusCode),
}

impl From<StatusCode> for UpdateStatus {
    fn from(status: StatusCode) -> Self {
        match status {
            StatusCode::OK => UpdateStatus::Updated,
            StatusCode::NOT_FOUND => UpdateStatus::NotFound,
            StatusCode::FORBIDDEN => UpdateStatus::Forbidden,
            other => UpdateStatus::Unexpected(other),
        }
    }
}

/// Recognised results of a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStatus {
    Deleted,
    NotFound,
    Forbidden,
    Unexpected(StatusCode),
}

impl From<StatusCode> for DeleteStatus {
    fn from(status: StatusCode) -> Self {
        match status {
            StatusCode::NO_CONTENT => DeleteStatus::Deleted,
            StatusCode::NOT_FOUND => DeleteStatus::NotFound,
            StatusCode::FORBIDDEN => DeleteStatus::Forbidden,
            other => DeleteStatus::Unexpected(other),
        }
    }
}

/// Blocking client bound to one API base URL. Built once and reused for
/// every call in a run.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(cfg.timeout)
            .connect_timeout(cfg.connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Http(format!("build client: {e}")))?;

        Ok(ApiClient {
            client,
            base_url: cfg.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/records`
    pub fn records_url(&self) -> Result<Url, ClientError> {
        Ok(self.base_url.join("records")?)
    }

    /// `{base}/records/{id}`
    pub fn record_url(&self, id: i64) -> Result<Url, ClientError> {
        Ok(self.base_url.join(&format!("records/{id}"))?)
    }

    fn finish(&self, request: reqwest::blocking::RequestBuilder) -> Result<ServiceResponse, ClientError> {
        let res = request.send()?;
        let status = res.status();
        let body = res.text()?;
        tracing::debug!(status = %status, bytes = body.len(), "response received");
        Ok(ServiceResponse { status, body })
    }
}

impl RecordService for ApiClient {
    fn create(&self, record: &Record) -> Result<ServiceResponse, ClientError> {
        let url = self.records_url()?;
        tracing::debug!(%url, title = %record.title, "POST record");
        self.finish(self.client.post(url).json(record))
    }

    fn get(&self, id: i64) -> Result<ServiceResponse, ClientError> {
        let url = self.record_url(id)?;
        tracing::debug!(%url, "GET record");
        self.finish(self.client.get(url))
    }

    fn list(&self) -> Result<ServiceResponse, ClientError> {
        let url = self.records_url()?;
        tracing::debug!(%url, "GET records");
        self.finish(self.client.get(url))
    }

    fn update(&self, id: i64, record: &Record, owner: &str) -> Result<ServiceResponse, ClientError> {
        let url = self.record_url(id)?;
        tracing::debug!(%url, owner, "PUT record");
        self.finish(self.client.put(url).query(&[("owner", owner)]).json(record))
    }

    fn delete(&self, id: i64, owner: &str) -> Result<ServiceResponse, ClientError> {
        let url = self.record_url(id)?;
        tracing::debug!(%url, owner, "DELETE record");
        self.finish(self.client.delete(url).query(&[("owner", owner)]))
    }
}
