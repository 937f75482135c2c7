// Prompt constants for the matching clients.

/// Upper bound on resume characters sent to the model.
pub const MAX_RESUME_CHARS: usize = 12_000;

pub const SCORE_SYSTEM: &str = "You are an AI hiring tool. \
    Analyze the resume text against the job description and required skills. \
    Respond with a JSON object containing a \"score\" (integer 0-100) and a brief \"reason\". \
    Do NOT use markdown code fences. \
    Do NOT include any text outside the JSON object.";

pub const SUMMARY_SYSTEM: &str = "You are an AI recruiter assistant. \
    Summarize the following candidate resume text in 3-4 concise professional sentences. \
    Focus on key skills, experience, and achievements.";

/// Builds the user message for fit scoring.
pub fn build_score_prompt(resume_text: &str, job_description: &str, skills: &[String]) -> String {
    format!(
        "Job Config: {}\n\nJob Desc: {}\n\nResume: {}",
        skills.join(", "),
        job_description.trim(),
        truncate_resume(resume_text)
    )
}

/// Builds the user message for summarization.
pub fn build_summary_prompt(resume_text: &str) -> String {
    truncate_resume(resume_text).to_string()
}

fn truncate_resume(text: &str) -> &str {
    let text = text.trim();
    match text.char_indices().nth(MAX_RESUME_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
