use std::future::Future;
use thiserror::Error;

/// Shown when the generator fails without saying why.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Failed to generate story. Please try again.";

/// The single failure kind raised by a story generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", display_message(.message))]
pub struct GenerationFailure {
    message: Option<String>,
}

impl GenerationFailure {
    /// Blank messages are treated as absent.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let trimmed = message.trim();
        Self {
            message: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        }
    }

    pub fn unknown() -> Self {
        Self { message: None }
    }

    pub fn timed_out(after: std::time::Duration) -> Self {
        let secs = after.as_secs();
        let span = if secs == 1 {
            "1 second".to_string()
        } else if secs > 0 {
            format!("{secs} seconds")
        } else {
            format!("{} ms", after.as_millis())
        };
        Self::new(format!("Story generation timed out after {span}"))
    }

    pub fn cancelled() -> Self {
        Self::new("Story generation was cancelled")
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn user_message(&self) -> &str {
        display_message(&self.message)
    }
}

fn display_message(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or(FALLBACK_FAILURE_MESSAGE)
}

impl From<anyhow::Error> for GenerationFailure {
    fn from(err: anyhow::Error) -> Self {
        Self::new(format!("{err:#}"))
    }
}

/// External text-generation service: prompt in, story text out.
pub trait StoryGenerator {
    fn generate_story(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, GenerationFailure>> + Send;
}
