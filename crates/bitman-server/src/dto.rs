use serde::{Deserialize, Serialize};

use bitman_core::models::{AskResponse, ProviderOutcome};

// ---------------------------------------------------------------------------
// Ask
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    /// Question as edited by the user; defaults to the raw selection.
    pub question: Option<String>,
    /// Text selected on the page, possibly containing labelled options.
    #[serde(default)]
    pub raw_selection: String,
}

/// One provider's result.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProviderAnswer {
    /// `answered` or `failed`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Failure kind, e.g. `http`, `transport`, `provider`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Text to display: the answer, or `Error: <message>`
    pub text: String,
}

impl From<ProviderOutcome> for ProviderAnswer {
    fn from(outcome: ProviderOutcome) -> Self {
        let text = outcome.display_text();
        match outcome {
            ProviderOutcome::Answered { answer } => Self {
                status: "answered".to_string(),
                answer: Some(answer),
                kind: None,
                message: None,
                text,
            },
            ProviderOutcome::Failed { kind, message } => Self {
                status: "failed".to_string(),
                answer: None,
                kind: Some(kind.to_string()),
                message: Some(message),
                text,
            },
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskResponseBody {
    /// Absent provider = no API key configured.
    pub openai_answer: Option<ProviderAnswer>,
    pub gemini_answer: Option<ProviderAnswer>,
    pub options: Vec<String>,
}

impl From<AskResponse> for AskResponseBody {
    fn from(response: AskResponse) -> Self {
        Self {
            openai_answer: response.openai_answer.map(ProviderAnswer::from),
            gemini_answer: response.gemini_answer.map(ProviderAnswer::from),
            options: response.options,
        }
    }
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
