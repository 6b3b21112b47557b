use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),
    #[error("response body is not valid JSON: {0}")]
    InvalidBody(#[from] serde_json::Error),
}

/// Anything that can hand back the JSON document behind a URL.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

/// Plain GET over HTTP(S). One attempt per call.
pub struct HttpRecordSource {
    client: Client,
}

impl HttpRecordSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RecordSource for HttpRecordSource {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        let body = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(serde_json::from_slice(&body)?)
    }
}
