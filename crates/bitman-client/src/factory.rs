use bitman_core::ask::AskService;
use bitman_core::config::Settings;
use bitman_core::error::AppError;
use bitman_core::traits::Transport;

use crate::gemini::GeminiClient;
use crate::openai::OpenAiClient;
use crate::transport::ReqwestTransport;

/// Ask service wired to the real providers over reqwest.
pub type ReqwestAskService =
    AskService<OpenAiClient<ReqwestTransport>, GeminiClient<ReqwestTransport>>;

/// Builds provider clients from settings over a shared transport.
///
/// A client is only created for a provider whose API key is set, so an
/// unconfigured provider is never called.
#[derive(Clone)]
pub struct ProviderFactory<T: Transport> {
    transport: T,
}

impl<T: Transport> ProviderFactory<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn openai(&self, settings: &Settings) -> Option<OpenAiClient<T>> {
        settings.has_openai().then(|| {
            OpenAiClient::new(
                self.transport.clone(),
                &settings.openai_key,
                &settings.model_openai,
            )
            .with_base_url(&settings.openai_base_url)
            .with_organization(&settings.openai_org)
            .with_project(&settings.openai_project)
        })
    }

    pub fn gemini(&self, settings: &Settings) -> Option<GeminiClient<T>> {
        settings.has_gemini().then(|| {
            GeminiClient::new(
                self.transport.clone(),
                &settings.gemini_key,
                &settings.model_gemini,
            )
            .with_base_url(&settings.gemini_base_url)
        })
    }

    pub fn service(&self, settings: &Settings) -> AskService<OpenAiClient<T>, GeminiClient<T>> {
        AskService::new(self.openai(settings), self.gemini(settings))
    }
}

/// Build an ask service for `settings` with a fresh reqwest transport.
pub fn service_from_settings(settings: &Settings) -> Result<ReqwestAskService, AppError> {
    let transport = ReqwestTransport::from_timeout(settings.request_timeout())?;
    Ok(ProviderFactory::new(transport).service(settings))
}
