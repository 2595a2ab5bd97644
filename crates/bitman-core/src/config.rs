use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// User settings: provider keys, models and endpoints.
///
/// Serialized with the same keys the browser extension keeps in storage, so
/// an exported settings object can be used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub openai_key: String,
    pub gemini_key: String,
    #[serde(rename = "modelOpenAI")]
    pub model_openai: String,
    pub model_gemini: String,
    pub openai_org: String,
    pub openai_project: String,
    pub openai_base_url: String,
    pub gemini_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_key: String::new(),
            gemini_key: String::new(),
            model_openai: DEFAULT_OPENAI_MODEL.to_string(),
            model_gemini: DEFAULT_GEMINI_MODEL.to_string(),
            openai_org: String::new(),
            openai_project: String::new(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    /// Load settings from an optional JSON file, then apply environment overrides.
    ///
    /// A missing file is not an error (defaults are used). Environment
    /// variables:
    /// - `BITMAN_OPENAI_KEY`, `BITMAN_GEMINI_KEY`
    /// - `BITMAN_OPENAI_MODEL`, `BITMAN_GEMINI_MODEL`
    /// - `BITMAN_OPENAI_ORG`, `BITMAN_OPENAI_PROJECT`
    /// - `BITMAN_OPENAI_BASE_URL`, `BITMAN_GEMINI_BASE_URL`
    /// - `BITMAN_REQUEST_TIMEOUT_SECS` (optional, positive integer)
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load), with overrides read from `lookup` instead of the process environment.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let base = match path {
            Some(p) if p.exists() => Self::from_file(p)?,
            _ => Self::default(),
        };
        base.with_overrides(lookup)
    }

    /// Read settings from environment variables only.
    pub fn from_env() -> Result<Self, AppError> {
        Self::load(None)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::ConfigError(format!("Failed to read {}: {e}", path.display()))
        })?;
        let settings: Settings = serde_json::from_str(&raw).map_err(|e| {
            AppError::ConfigError(format!("Invalid settings file {}: {e}", path.display()))
        })?;
        Ok(settings.normalized())
    }

    /// Write settings as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(&self.clone().normalized())?;
        std::fs::write(path, json)
            .map_err(|e| AppError::ConfigError(format!("Failed to write {}: {e}", path.display())))
    }

    /// Apply non-empty overrides from `lookup` (the environment in [`load`](Self::load)).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(v) = get("BITMAN_OPENAI_KEY") {
            self.openai_key = v;
        }
        if let Some(v) = get("BITMAN_GEMINI_KEY") {
            self.gemini_key = v;
        }
        if let Some(v) = get("BITMAN_OPENAI_MODEL") {
            self.model_openai = v;
        }
        if let Some(v) = get("BITMAN_GEMINI_MODEL") {
            self.model_gemini = v;
        }
        if let Some(v) = get("BITMAN_OPENAI_ORG") {
            self.openai_org = v;
        }
        if let Some(v) = get("BITMAN_OPENAI_PROJECT") {
            self.openai_project = v;
        }
        if let Some(v) = get("BITMAN_OPENAI_BASE_URL") {
            self.openai_base_url = v;
        }
        if let Some(v) = get("BITMAN_GEMINI_BASE_URL") {
            self.gemini_base_url = v;
        }
        if let Some(raw) = get("BITMAN_REQUEST_TIMEOUT_SECS") {
            let parsed: u64 = raw.parse().map_err(|_| {
                AppError::ConfigError(format!(
                    "Invalid BITMAN_REQUEST_TIMEOUT_SECS '{raw}': must be a positive integer"
                ))
            })?;
            if parsed == 0 {
                return Err(AppError::ConfigError(
                    "BITMAN_REQUEST_TIMEOUT_SECS must be at least 1".into(),
                ));
            }
            self.request_timeout_secs = Some(parsed);
        }

        Ok(self.normalized())
    }

    /// Trim every value and restore defaults for blank models and endpoints.
    pub fn normalized(mut self) -> Self {
        fn tidy(value: &mut String, default: &str) {
            let trimmed = value.trim();
            *value = if trimmed.is_empty() {
                default.to_string()
            } else {
                trimmed.to_string()
            };
        }

        tidy(&mut self.openai_key, "");
        tidy(&mut self.gemini_key, "");
        tidy(&mut self.openai_org, "");
        tidy(&mut self.openai_project, "");
        tidy(&mut self.model_openai, DEFAULT_OPENAI_MODEL);
        tidy(&mut self.model_gemini, DEFAULT_GEMINI_MODEL);
        tidy(&mut self.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        tidy(&mut self.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        if self.request_timeout_secs == Some(0) {
            self.request_timeout_secs = None;
        }
        self
    }

    pub fn has_openai(&self) -> bool {
        !self.openai_key.is_empty()
    }

    pub fn has_gemini(&self) -> bool {
        !self.gemini_key.is_empty()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Copy of the settings safe to print: keys are masked.
    pub fn redacted(&self) -> Self {
        Self {
            openai_key: mask_secret(&self.openai_key),
            gemini_key: mask_secret(&self.gemini_key),
            ..self.clone()
        }
    }
}

/// `sk-abcdefghwxyz` → `sk-a...wxyz`. Short secrets are fully masked.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
