pub mod ask;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod options;
pub mod prompt;
pub mod traits;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use ask::AskService;
pub use config::Settings;
pub use error::AppError;
pub use models::{AskResponse, FailureKind, Provider, ProviderOutcome};
pub use normalize::normalize_answer;
pub use options::extract_options;
pub use prompt::build_prompt;
pub use traits::{AnswerProvider, HttpReply, HttpRequest, Transport};
