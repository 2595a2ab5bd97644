//! Test utilities: mock implementations of the core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::Provider;
use crate::traits::{AnswerProvider, HttpReply, HttpRequest, Transport};

// ---------------------------------------------------------------------------
// MockTransport
// ---------------------------------------------------------------------------

/// Mock transport that replays queued replies and records every request.
#[derive(Clone, Default)]
pub struct MockTransport {
    /// Queue of replies. Each call pops the first element.
    /// If empty, returns a 500 so unexpected extra calls fail loudly.
    replies: Arc<Mutex<Vec<Result<HttpReply, AppError>>>>,
    pub requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: Vec<Result<HttpReply, AppError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn recorded(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpReply, AppError> {
        self.requests.lock().unwrap().push(request);
        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            Ok(reply(500, "Internal Server Error", "no reply queued"))
        } else {
            replies.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockProvider
// ---------------------------------------------------------------------------

/// Mock provider that returns configurable raw replies.
#[derive(Clone)]
pub struct MockProvider {
    provider: Provider,
    responses: Arc<Mutex<Vec<Result<String, AppError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new(provider: Provider, reply: &str) -> Self {
        Self::with_responses(provider, vec![Ok(reply.to_string())])
    }

    pub fn with_error(provider: Provider, error: AppError) -> Self {
        Self::with_responses(provider, vec![Err(error)])
    }

    pub fn with_responses(provider: Provider, responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            provider,
            responses: Arc::new(Mutex::new(responses)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl AnswerProvider for MockProvider {
    fn provider(&self) -> Provider {
        self.provider
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn ask(&self, prompt: &str) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok("A".to_string())
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Build a reply with a raw body.
pub fn reply(status: u16, status_text: &str, body: &str) -> HttpReply {
    HttpReply {
        status,
        status_text: status_text.to_string(),
        body: body.to_string(),
    }
}

/// Build a 200 reply with a JSON body.
pub fn json_ok(body: serde_json::Value) -> Result<HttpReply, AppError> {
    Ok(reply(200, "OK", &body.to_string()))
}

/// OpenAI chat-completions success body.
pub fn chat_completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// OpenAI error body as returned with non-success statuses.
pub fn openai_error(message: &str) -> String {
    serde_json::json!({
        "error": { "message": message, "type": "invalid_request_error" }
    })
    .to_string()
}

/// Gemini generate-content success body.
pub fn gemini_candidate(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}
