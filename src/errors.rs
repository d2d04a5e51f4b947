// Error taxonomy shared by the client. Transport and decoding failures
// are flattened to strings so outcomes can carry them around freely.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("source not found: {0}")]
    SourceNotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Parse(e.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        ClientError::Config(format!("invalid url: {e}"))
    }
}
