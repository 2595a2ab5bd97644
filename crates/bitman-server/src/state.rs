use std::path::PathBuf;

use bitman_client::ReqwestTransport;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    /// Bearer token required on `/v1` routes.
    pub api_key: String,
    /// Settings file re-read before every ask.
    pub settings_path: Option<PathBuf>,
    /// HTTP transport shared by every ask; its timeout is fixed at startup.
    pub transport: ReqwestTransport,
    /// Source of the `BITMAN_*` overrides applied on top of the settings file.
    pub env: fn(&str) -> Option<String>,
}

/// Reads overrides from the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
