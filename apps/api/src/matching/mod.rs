// Resume-to-job matching: fit scoring and resume summarization.
// Both clients share one `AiBackend` and never fail outward: any remote
// problem yields a `RemoteResult::Degraded` carrying a fallback value.

pub mod prompts;
pub mod scoring;
pub mod summarizer;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::{AiConfig, AiMode};
use crate::llm_client::breaker::CircuitBreaker;
use crate::llm_client::{ChatCompletion, LlmClient, LlmError};

pub use scoring::FitScorer;
pub use summarizer::ResumeSummarizer;

/// Previewed scores at or below this are presented as an insufficient match.
/// Advisory only: the apply path never rejects on score.
pub const MATCH_THRESHOLD: u8 = 50;

/// Fit score (0–100) plus the model's rationale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub reason: String,
}

impl ScoreResult {
    pub fn qualifies(&self) -> bool {
        self.score > MATCH_THRESHOLD
    }
}

/// Outcome of a remote call that always produces a usable value.
#[derive(Debug)]
pub enum RemoteResult<T> {
    Success(T),
    Degraded { value: T, cause: LlmError },
}

impl<T> RemoteResult<T> {
    pub fn into_value(self) -> T {
        match self {
            RemoteResult::Success(v) | RemoteResult::Degraded { value: v, .. } => v,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, RemoteResult::Degraded { .. })
    }

    /// Logs why a result degraded. Offline mode is expected and stays quiet.
    fn log_degraded(&self, operation: &str) {
        match self {
            RemoteResult::Success(_) => {}
            RemoteResult::Degraded {
                cause: LlmError::NotConfigured,
                ..
            } => tracing::debug!("{operation}: no AI credential configured, using fallback"),
            RemoteResult::Degraded { cause, .. } => {
                tracing::warn!("{operation} failed, using fallback: {cause}")
            }
        }
    }
}

/// Where matching requests go. Chosen once at startup from `AiMode`.
#[derive(Clone)]
pub enum AiBackend {
    Offline,
    Remote(Arc<dyn ChatCompletion>),
}

impl AiBackend {
    pub fn from_config(config: &AiConfig) -> Result<Self, LlmError> {
        match &config.mode {
            AiMode::Offline => Ok(AiBackend::Offline),
            AiMode::Live {
                api_key,
                endpoint,
                model,
            } => {
                let client = LlmClient::new(
                    api_key.clone(),
                    endpoint.clone(),
                    model.clone(),
                    config.timeout,
                    CircuitBreaker::new(config.breaker_threshold, config.breaker_cooldown),
                )?;
                Ok(AiBackend::Remote(Arc::new(client)))
            }
        }
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        match self {
            AiBackend::Offline => Err(LlmError::NotConfigured),
            AiBackend::Remote(chat) => chat.complete(system, user).await,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_exclusive() {
        let at = ScoreResult {
            score: 50,
            reason: "r".into(),
        };
        let above = ScoreResult {
            score: 51,
            reason: "r".into(),
        };
        assert!(!at.qualifies());
        assert!(above.qualifies());
    }

    #[test]
    fn test_remote_result_accessors() {
        let ok = RemoteResult::Success(7);
        assert!(!ok.is_degraded());
        assert_eq!(ok.into_value(), 7);

        let degraded = RemoteResult::Degraded {
            value: 3,
            cause: LlmError::NotConfigured,
        };
        assert!(degraded.is_degraded());
        assert_eq!(degraded.into_value(), 3);
    }
}
