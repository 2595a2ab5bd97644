use std::future::Future;

use crate::error::AppError;
use crate::models::Provider;

/// A JSON `POST` to a provider endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Value of the first header named `name` (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status line and body of a provider reply, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends provider requests over the wire.
///
/// Non-success statuses are returned as an `HttpReply`, not an error; only
/// failures to get a reply at all are `Err`.
pub trait Transport: Send + Sync + Clone {
    fn post_json(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpReply, AppError>> + Send;
}

/// A language-model provider that answers a prompt with raw text.
pub trait AnswerProvider: Send + Sync + Clone {
    fn provider(&self) -> Provider;

    /// Model the provider was configured with.
    fn model(&self) -> &str;

    /// Sends the prompt and returns the trimmed reply text, before normalization.
    fn ask(&self, prompt: &str) -> impl Future<Output = Result<String, AppError>> + Send;
}
