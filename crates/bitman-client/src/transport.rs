use std::time::Duration;

use bitman_core::error::AppError;
use bitman_core::traits::{HttpReply, HttpRequest, Transport};
use reqwest::Client;

/// HTTP transport using reqwest.
///
/// No timeout is applied unless one is configured with
/// [`with_timeout`](Self::with_timeout); a hung provider then hangs its call.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_secs: Option<u64>,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, AppError> {
        Self::build(None)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, AppError> {
        Self::build(Some(timeout))
    }

    /// Build from an optional timeout, as read from settings.
    pub fn from_timeout(timeout: Option<Duration>) -> Result<Self, AppError> {
        Self::build(timeout)
    }

    fn build(timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = Client::builder().user_agent(concat!("BitMan/", env!("CARGO_PKG_VERSION")));
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.map(|t| t.as_secs()),
        })
    }
}

impl Transport for ReqwestTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpReply, AppError> {
        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout(self.timeout_secs.unwrap_or_default())
            } else if e.is_connect() {
                AppError::NetworkError(format!("Connection failed: {e}"))
            } else {
                AppError::HttpError(e.without_url().to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::HttpError(format!("Failed to read response body: {e}")))?;

        Ok(HttpReply {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}
