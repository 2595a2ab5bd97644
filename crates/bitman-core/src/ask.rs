use tracing::Instrument;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{AskResponse, Provider, ProviderOutcome};
use crate::normalize::normalize_answer;
use crate::options::extract_options;
use crate::prompt::build_prompt;
use crate::traits::AnswerProvider;

/// Orchestrates one ask: extract options → build prompt → ask providers → normalize.
///
/// Generic over both providers so tests can inject mocks. A `None` provider
/// has no API key and is never called.
pub struct AskService<O, G>
where
    O: AnswerProvider,
    G: AnswerProvider,
{
    openai: Option<O>,
    gemini: Option<G>,
}

impl<O, G> AskService<O, G>
where
    O: AnswerProvider,
    G: AnswerProvider,
{
    pub fn new(openai: Option<O>, gemini: Option<G>) -> Self {
        Self { openai, gemini }
    }

    /// True if at least one provider can be asked.
    pub fn is_configured(&self) -> bool {
        self.openai.is_some() || self.gemini.is_some()
    }

    pub fn configured_providers(&self) -> Vec<Provider> {
        let mut providers = Vec::with_capacity(2);
        if let Some(p) = &self.openai {
            providers.push(p.provider());
        }
        if let Some(p) = &self.gemini {
            providers.push(p.provider());
        }
        providers
    }

    /// Run the pipeline for a question and the raw selection it came from.
    ///
    /// Provider failures are reported in their own field and never fail the
    /// whole ask. The only error is [`AppError::NotConfigured`], returned
    /// before any network call.
    pub async fn ask(&self, question: &str, raw_selection: &str) -> Result<AskResponse, AppError> {
        let options = extract_options(raw_selection);

        if !self.is_configured() {
            return Err(AppError::NotConfigured);
        }

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("ask", %request_id);

        async move {
            tracing::info!(
                options = options.len(),
                providers = ?self.configured_providers(),
                "Asking providers"
            );

            let prompt = build_prompt(question, &options);

            let (openai_answer, gemini_answer) = tokio::join!(
                run_provider(self.openai.as_ref(), &prompt, &options),
                run_provider(self.gemini.as_ref(), &prompt, &options),
            );

            Ok(AskResponse {
                openai_answer,
                gemini_answer,
                options,
            })
        }
        .instrument(span)
        .await
    }
}

async fn run_provider<P: AnswerProvider>(
    provider: Option<&P>,
    prompt: &str,
    options: &[String],
) -> Option<ProviderOutcome> {
    let provider = provider?;

    let outcome = match provider.ask(prompt).await {
        Ok(raw) => {
            let answer = normalize_answer(&raw, options);
            tracing::info!(
                provider = %provider.provider(),
                model = provider.model(),
                matched = options.contains(&answer),
                "Provider answered"
            );
            ProviderOutcome::Answered { answer }
        }
        Err(e) => {
            tracing::warn!(
                provider = %provider.provider(),
                model = provider.model(),
                error = %e,
                "Provider failed"
            );
            ProviderOutcome::failed(&e)
        }
    };

    Some(outcome)
}
