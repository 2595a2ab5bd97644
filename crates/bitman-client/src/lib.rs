pub mod factory;
pub mod gemini;
pub mod openai;
pub mod transport;

pub use factory::{ProviderFactory, ReqwestAskService, service_from_settings};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use transport::ReqwestTransport;
