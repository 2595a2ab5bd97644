use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BitMan API",
        version = "0.2.0",
        description = "Ask OpenAI and Gemini to pick the answer to a quiz question."
    ),
    paths(crate::routes::ask, crate::routes::health),
    components(schemas(
        crate::dto::AskRequest,
        crate::dto::AskResponseBody,
        crate::dto::ProviderAnswer,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "ask", description = "Quiz answering"),
        (name = "system", description = "Health and system status"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Adds Bearer token security scheme to the OpenAPI document.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("token")
                        .description(Some(
                            "Server API key. Set via BITMAN_SERVER_API_KEY environment variable.",
                        ))
                        .build(),
                ),
            );
        }
    }
}
