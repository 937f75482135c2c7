//! Resume Summarizer: a 3–4 sentence professional summary of a resume.

use crate::llm_client::LlmError;
use crate::matching::prompts::{build_summary_prompt, SUMMARY_SYSTEM};
use crate::matching::{AiBackend, RemoteResult};

pub const FALLBACK_SUMMARY: &str = "Qualified candidate with strong experience in the required skills. \
    Demonstrated ability to deliver projects on time. \
    Good fit for the role based on the resume provided.";

#[derive(Clone)]
pub struct ResumeSummarizer {
    backend: AiBackend,
}

impl ResumeSummarizer {
    pub fn new(backend: AiBackend) -> Self {
        Self { backend }
    }

    /// Single attempt; any failure yields `FALLBACK_SUMMARY`.
    pub async fn summarize(&self, resume_text: &str) -> RemoteResult<String> {
        let prompt = build_summary_prompt(resume_text);

        let outcome = self
            .backend
            .complete(SUMMARY_SYSTEM, &prompt)
            .await
            .and_then(|text| {
                let text = text.trim();
                if text.is_empty() {
                    Err(LlmError::EmptyContent)
                } else {
                    Ok(text.to_string())
                }
            });

        let result = match outcome {
            Ok(summary) => RemoteResult::Success(summary),
            Err(cause) => RemoteResult::Degraded {
                value: FALLBACK_SUMMARY.to_string(),
                cause,
            },
        };
        result.log_degraded("Resume summary");
        result
    }
}
