use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use serde::Deserialize;
use tempfile::TempDir;
use tokio::net::TcpListener;

use bitman_client::ReqwestTransport;
use bitman_core::Settings;
use bitman_server::routes;
use bitman_server::state::AppState;

pub const TEST_API_KEY: &str = "test-secret-key";

/// Model name the stub rejects with 404, to exercise the OpenAI fallback chain.
pub const MISSING_MODEL: &str = "gpt-missing";

/// Gemini key the stub rejects with 400.
pub const BAD_GEMINI_KEY: &str = "bad-key";

pub struct TestApp {
    pub router: Router,
    pub settings_path: PathBuf,
    _dir: TempDir,
}

/// Build the server router with `settings` written to a temporary settings file.
///
/// The process environment is ignored so a developer's `BITMAN_*` variables
/// cannot leak into the results.
pub fn setup_test_app(settings: &Settings) -> TestApp {
    setup_test_app_with_env(settings, no_env)
}

/// Like [`setup_test_app`], with `BITMAN_*` overrides read from `env`.
pub fn setup_test_app_with_env(settings: &Settings, env: fn(&str) -> Option<String>) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let settings_path = dir.path().join("bitman.json");
    settings
        .save(&settings_path)
        .expect("Failed to write settings");

    let state = Arc::new(AppState {
        api_key: TEST_API_KEY.to_string(),
        settings_path: Some(settings_path.clone()),
        transport: ReqwestTransport::new().expect("Failed to build transport"),
        env,
    });

    TestApp {
        router: routes::router(state),
        settings_path,
        _dir: dir,
    }
}

fn no_env(_key: &str) -> Option<String> {
    None
}

/// In-process stand-in for the OpenAI and Gemini APIs.
///
/// OpenAI chat answers `"B"` unless the model is [`MISSING_MODEL`]; Gemini
/// answers `"paris"` unless the key is [`BAD_GEMINI_KEY`]. Every request is
/// recorded as `"openai:<model>"` or `"gemini:<model>"`.
pub struct ProviderStub {
    pub base_url: String,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ProviderStub {
    pub async fn spawn() -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route("/v1/chat/completions", post(openai_chat))
            .route("/v1beta/models/{model_action}", post(gemini_generate))
            .with_state(calls.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Failed to read stub address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            calls,
        }
    }

    /// Settings pointing both providers at this stub, with no keys set.
    pub fn settings(&self) -> Settings {
        Settings {
            openai_base_url: format!("{}/v1", self.base_url),
            gemini_base_url: format!("{}/v1beta", self.base_url),
            ..Settings::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

type Calls = Arc<Mutex<Vec<String>>>;

async fn openai_chat(
    State(calls): State<Calls>,
    axum::Json(body): axum::Json<serde_json::Value>,
) -> impl IntoResponse {
    let model = body["model"].as_str().unwrap_or_default().to_string();
    calls.lock().unwrap().push(format!("openai:{model}"));

    if model == MISSING_MODEL {
        let error = serde_json::json!({
            "error": { "message": format!("The model `{model}` does not exist"), "type": "invalid_request_error" }
        });
        return (StatusCode::NOT_FOUND, axum::Json(error));
    }

    let reply = serde_json::json!({
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": "B" } }]
    });
    (StatusCode::OK, axum::Json(reply))
}

#[derive(Deserialize)]
struct KeyQuery {
    key: String,
}

async fn gemini_generate(
    State(calls): State<Calls>,
    Path(model_action): Path<String>,
    Query(query): Query<KeyQuery>,
) -> impl IntoResponse {
    let model = model_action
        .strip_suffix(":generateContent")
        .unwrap_or(&model_action)
        .to_string();
    calls.lock().unwrap().push(format!("gemini:{model}"));

    if query.key == BAD_GEMINI_KEY {
        let error = serde_json::json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        });
        return (StatusCode::BAD_REQUEST, axum::Json(error));
    }

    let reply = serde_json::json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": "paris\n" }] } }]
    });
    (StatusCode::OK, axum::Json(reply))
}
