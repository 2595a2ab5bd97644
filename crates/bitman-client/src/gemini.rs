use bitman_core::config::DEFAULT_GEMINI_BASE_URL;
use bitman_core::error::AppError;
use bitman_core::models::Provider;
use bitman_core::traits::{AnswerProvider, HttpRequest, Transport};
use serde::{Deserialize, Serialize};
use url::Url;

const GENERIC_ERROR: &str = "Gemini API error";

/// Gemini generate-content client.
///
/// One request per ask, no fallback. Non-success statuses collapse into a
/// generic error; the body is only logged at debug level.
#[derive(Clone)]
pub struct GeminiClient<T: Transport> {
    transport: T,
    base_url: String,
    api_key: String,
    model: String,
}

impl<T: Transport> GeminiClient<T> {
    pub fn new(transport: T, api_key: &str, model: &str) -> Self {
        Self {
            transport,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// `<base>/models/<model>:generateContent?key=<api_key>`
    fn endpoint(&self) -> Result<String, AppError> {
        let mut url = Url::parse(&format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        ))
        .map_err(|e| AppError::ConfigError(format!("Invalid Gemini endpoint: {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url.into())
    }
}

impl<T: Transport> AnswerProvider for GeminiClient<T> {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn ask(&self, prompt: &str) -> Result<String, AppError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };

        tracing::debug!(model = %self.model, "Gemini generate content");
        let reply = self
            .transport
            .post_json(HttpRequest::new(self.endpoint()?, serde_json::to_value(&body)?))
            .await?;

        if !reply.is_success() {
            tracing::debug!(status = reply.status, body = %reply.body, "Gemini request failed");
            return Err(AppError::ProviderError(GENERIC_ERROR.into()));
        }

        let parsed: GenerateResponse = serde_json::from_str(&reply.body)
            .map_err(|e| AppError::UnexpectedResponse(format!("generate content: {e}")))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::UnexpectedResponse("no candidate text in Gemini reply".into()))
    }
}

// ---- Gemini API types ----

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
