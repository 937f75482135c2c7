//! Fit Scoring: asks the remote model how well a resume fits a job.
//!
//! The model is asked for `{ "score": 0-100, "reason": "..." }`. Anything that
//! goes wrong (offline mode, transport failure, fenced or malformed JSON that
//! cannot be repaired, an out-of-range score) degrades to a random score in
//! `FALLBACK_SCORE_MIN..=FALLBACK_SCORE_MAX` so intake never blocks on the
//! third party.

use rand::Rng;
use serde::de::Error as _;
use serde::Deserialize;

use crate::llm_client::{strip_json_fences, LlmError};
use crate::matching::prompts::{build_score_prompt, SCORE_SYSTEM};
use crate::matching::{AiBackend, RemoteResult, ScoreResult};

pub const FALLBACK_SCORE_MIN: u8 = 70;
pub const FALLBACK_SCORE_MAX: u8 = 95;
pub const FALLBACK_REASON: &str = "Candidate matches the required skills and experience level. \
    Strong background in relevant technologies.";
const MISSING_REASON: &str = "No detailed reason provided.";

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct FitScorer {
    backend: AiBackend,
}

impl FitScorer {
    pub fn new(backend: AiBackend) -> Self {
        Self { backend }
    }

    /// Scores `resume_text` against a job. Single attempt, never errors.
    pub async fn score(
        &self,
        resume_text: &str,
        job_description: &str,
        required_skills: &[String],
    ) -> RemoteResult<ScoreResult> {
        let prompt = build_score_prompt(resume_text, job_description, required_skills);

        let outcome = match self.backend.complete(SCORE_SYSTEM, &prompt).await {
            Ok(text) => parse_score_response(&text),
            Err(e) => Err(e),
        };

        let result = match outcome {
            Ok(score) => RemoteResult::Success(score),
            Err(cause) => RemoteResult::Degraded {
                value: fallback_score(),
                cause,
            },
        };
        result.log_degraded("Fit scoring");
        result
    }
}

/// Uniformly random score in the fallback band with the generic reason.
pub fn fallback_score() -> ScoreResult {
    let score = rand::thread_rng().gen_range(FALLBACK_SCORE_MIN..=FALLBACK_SCORE_MAX);
    ScoreResult {
        score,
        reason: FALLBACK_REASON.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Response parsing
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawScore {
    score: RawNumber,
    #[serde(default)]
    reason: Option<String>,
}

/// Models are loose with numbers: `85`, `85.4` and `"85"` all show up.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    fn to_integer(&self) -> Result<i64, LlmError> {
        let value = match self {
            RawNumber::Int(i) => return Ok(*i),
            RawNumber::Float(f) => *f,
            RawNumber::Text(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().map_err(|_| {
                LlmError::Parse(serde_json::Error::custom(format!("non-numeric score {s:?}")))
            })?,
        };
        if !value.is_finite() {
            return Err(LlmError::Parse(serde_json::Error::custom(
                "score is not a finite number",
            )));
        }
        Ok(value.round() as i64)
    }
}

/// Parses the model's reply into a `ScoreResult`, stripping code fences first.
pub fn parse_score_response(text: &str) -> Result<ScoreResult, LlmError> {
    let raw: RawScore = serde_json::from_str(strip_json_fences(text))?;

    let score = raw.score.to_integer()?;
    let score = u8::try_from(score)
        .ok()
        .filter(|s| *s <= 100)
        .ok_or(LlmError::ScoreOutOfRange(score))?;

    let reason = raw
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| MISSING_REASON.to_string());

    Ok(ScoreResult { score, reason })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
