use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// The remote language-model APIs BitMan can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Gemini,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Gemini => "gemini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse classification of a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection, DNS, timeout or request-building failure.
    Transport,
    /// Non-success HTTP status with a provider message.
    Http,
    /// Generic provider failure with no details.
    Provider,
    /// 2xx reply whose body lacked the expected fields.
    UnexpectedResponse,
    Serialization,
    Config,
    Other,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Http => "http",
            FailureKind::Provider => "provider",
            FailureKind::UnexpectedResponse => "unexpected_response",
            FailureKind::Serialization => "serialization",
            FailureKind::Config => "config",
            FailureKind::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of asking one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProviderOutcome {
    /// Normalized answer (an option verbatim, or the raw reply if nothing matched).
    Answered { answer: String },
    Failed { kind: FailureKind, message: String },
}

impl ProviderOutcome {
    pub fn failed(err: &AppError) -> Self {
        ProviderOutcome::Failed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            ProviderOutcome::Answered { answer } => Some(answer),
            ProviderOutcome::Failed { .. } => None,
        }
    }

    pub fn is_answered(&self) -> bool {
        matches!(self, ProviderOutcome::Answered { .. })
    }

    /// Text to show in place of an answer: the answer, or `Error: <message>`.
    pub fn display_text(&self) -> String {
        match self {
            ProviderOutcome::Answered { answer } => answer.clone(),
            ProviderOutcome::Failed { message, .. } => format!("Error: {message}"),
        }
    }
}

/// Combined result of one ask. `None` means the provider was not configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub openai_answer: Option<ProviderOutcome>,
    pub gemini_answer: Option<ProviderOutcome>,
    /// Options extracted from the selection, in label order.
    pub options: Vec<String>,
}

impl AskResponse {
    pub fn outcome(&self, provider: Provider) -> Option<&ProviderOutcome> {
        match provider {
            Provider::OpenAi => self.openai_answer.as_ref(),
            Provider::Gemini => self.gemini_answer.as_ref(),
        }
    }
}
