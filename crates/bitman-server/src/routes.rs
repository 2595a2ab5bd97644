use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use bitman_client::ProviderFactory;
use bitman_core::{AppError, Settings};

use crate::auth::require_api_key;
use crate::dto::{AskRequest, AskResponseBody, HealthResponse};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/v1/ask", post(ask))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ));

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

// ---------------------------------------------------------------------------
// Ask
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/v1/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answers from the configured providers", body = AskResponseBody),
        (status = 400, description = "No API key configured or empty question", body = crate::dto::ErrorResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer" = [])),
    tag = "ask"
)]
pub async fn ask(
    State(state): State<Arc<AppState>>,
    axum::Json(body): axum::Json<AskRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let question = body
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| body.raw_selection.trim())
        .to_string();
    if question.is_empty() {
        return Err(AppError::InvalidInput("question is empty".into()).into());
    }

    // Settings are read per request so edits apply without a restart.
    let settings = Settings::load_with(state.settings_path.as_deref(), state.env)?;
    let service = ProviderFactory::new(state.transport.clone()).service(&settings);

    let response = service.ask(&question, &body.raw_selection).await?;

    Ok(axum::Json(AskResponseBody::from(response)))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health() -> impl IntoResponse {
    axum::Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}
