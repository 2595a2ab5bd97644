use bitman_core::config::DEFAULT_OPENAI_BASE_URL;
use bitman_core::error::AppError;
use bitman_core::models::Provider;
use bitman_core::traits::{AnswerProvider, HttpReply, HttpRequest, Transport};
use serde::{Deserialize, Serialize};

pub const SYSTEM_PROMPT: &str = "You answer only with the exact option text that best answers the question. If uncertain, return the single most likely option. Never invent new text.";

/// Models tried, in order, after the requested model fails.
const FALLBACK_MODELS: [&str; 2] = ["gpt-4o-mini", "gpt-4o"];

/// OpenAI client with a model fallback chain.
///
/// `ask` tries chat completions with the configured model, then with each
/// model in [`FALLBACK_MODELS`] that differs from it, then the responses
/// endpoint with the configured model. Attempts are strictly sequential.
#[derive(Clone)]
pub struct OpenAiClient<T: Transport> {
    transport: T,
    base_url: String,
    api_key: String,
    model: String,
    organization: Option<String>,
    project: Option<String>,
}

impl<T: Transport> OpenAiClient<T> {
    pub fn new(transport: T, api_key: &str, model: &str) -> Self {
        Self {
            transport,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            organization: None,
            project: None,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Sends `OpenAI-Organization` when `org` is not blank.
    pub fn with_organization(mut self, org: &str) -> Self {
        self.organization = non_blank(org);
        self
    }

    /// Sends `OpenAI-Project` when `project` is not blank.
    pub fn with_project(mut self, project: &str) -> Self {
        self.project = non_blank(project);
        self
    }

    fn request(&self, path: &str, body: serde_json::Value) -> HttpRequest {
        let mut request = HttpRequest::new(format!("{}/{path}", self.base_url), body)
            .header("Authorization", format!("Bearer {}", self.api_key));
        if let Some(org) = &self.organization {
            request = request.header("OpenAI-Organization", org.clone());
        }
        if let Some(project) = &self.project {
            request = request.header("OpenAI-Project", project.clone());
        }
        request
    }

    async fn chat(&self, model: &str, prompt: &str) -> Result<String, AppError> {
        let body = ChatRequest {
            model: model.to_string(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: 0.0,
        };

        tracing::debug!(model, "OpenAI chat completion");
        let reply = self
            .transport
            .post_json(self.request("chat/completions", serde_json::to_value(&body)?))
            .await?;
        if !reply.is_success() {
            return Err(api_error(&reply));
        }

        let chat: ChatResponse = serde_json::from_str(&reply.body)
            .map_err(|e| AppError::UnexpectedResponse(format!("chat completion: {e}")))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(AppError::UnexpectedResponse(
                "chat completion has no message content".into(),
            ));
        }
        Ok(content)
    }

    async fn responses(&self, prompt: &str) -> Result<String, AppError> {
        let body = ResponsesRequest {
            model: self.model.clone(),
            instructions: SYSTEM_PROMPT.to_string(),
            input: prompt.to_string(),
            temperature: 0.0,
        };

        tracing::debug!(model = %self.model, "OpenAI responses");
        let reply = self
            .transport
            .post_json(self.request("responses", serde_json::to_value(&body)?))
            .await?;
        if !reply.is_success() {
            return Err(api_error(&reply));
        }

        let parsed: ResponsesResponse = serde_json::from_str(&reply.body)
            .map_err(|e| AppError::UnexpectedResponse(format!("responses: {e}")))?;

        parsed
            .text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::UnexpectedResponse("responses output has no text".into()))
    }
}

impl<T: Transport> AnswerProvider for OpenAiClient<T> {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn ask(&self, prompt: &str) -> Result<String, AppError> {
        let chat_error = match self.chat(&self.model, prompt).await {
            Ok(content) => return Ok(content),
            Err(e) => e,
        };
        tracing::warn!(model = %self.model, error = %chat_error, "Chat completion failed");

        for fallback in FALLBACK_MODELS {
            if fallback == self.model {
                continue;
            }
            match self.chat(fallback, prompt).await {
                Ok(content) => {
                    tracing::info!(model = fallback, "Fallback model answered");
                    return Ok(content);
                }
                Err(e) => tracing::warn!(model = fallback, error = %e, "Fallback model failed"),
            }
        }

        match self.responses(prompt).await {
            Ok(content) => {
                tracing::info!(model = %self.model, "Responses endpoint answered");
                Ok(content)
            }
            Err(responses_error) => {
                tracing::warn!(error = %responses_error, "Responses endpoint failed");
                Err(most_specific(responses_error, chat_error))
            }
        }
    }
}

/// Prefer the responses error, then the first chat error, by non-empty message.
fn most_specific(responses_error: AppError, chat_error: AppError) -> AppError {
    if !responses_error.to_string().is_empty() {
        responses_error
    } else if !chat_error.to_string().is_empty() {
        chat_error
    } else {
        AppError::Generic("Unknown error".into())
    }
}

/// `HTTP <status> <statusText>: <error.message or raw body>`.
fn api_error(reply: &HttpReply) -> AppError {
    let message = serde_json::from_str::<ApiError>(&reply.body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| reply.body.clone());

    AppError::ApiError {
        status: reply.status,
        status_text: reply.status_text.clone(),
        message,
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ---- OpenAI API types ----

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct ResponsesRequest {
    model: String,
    instructions: String,
    input: String,
    temperature: f32,
}

#[derive(Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

impl ResponsesResponse {
    /// Top-level `output_text`, else the first `output_text` part of the first message.
    fn text(self) -> Option<String> {
        if let Some(text) = self.output_text.filter(|t| !t.trim().is_empty()) {
            return Some(text);
        }
        self.output
            .into_iter()
            .find(|item| item.kind == "message")?
            .content
            .into_iter()
            .find(|part| part.kind == "output_text")?
            .text
    }
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize)]
struct OutputContent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}
