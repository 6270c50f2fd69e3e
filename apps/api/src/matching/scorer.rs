//! Match scorer — cleans both texts, builds the review prompt, and returns the
//! model's evaluation. Stateless: every call is one provider round trip.

use tracing::debug;

use crate::llm_client::{ChatCompletion, LlmError};
use crate::matching::prompts::{match_prompt, MATCH_SYSTEM, MATCH_TEMPERATURE};

/// Strips carriage returns and zero-width spaces, then trims surrounding whitespace.
pub fn clean_text(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\r' | '\u{200b}'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Scores `resume` against `job_desc` and returns the model's trimmed free-text review.
/// Provider failures propagate unchanged; nothing is retried or cached.
pub async fn resume_match_score(
    llm: &dyn ChatCompletion,
    resume: &str,
    job_desc: &str,
) -> Result<String, LlmError> {
    let resume = clean_text(resume);
    let job_desc = clean_text(job_desc);
    debug!(
        resume_chars = resume.chars().count(),
        job_desc_chars = job_desc.chars().count(),
        "scoring cleaned inputs"
    );

    let prompt = match_prompt(&resume, &job_desc);
    let text = llm.complete(MATCH_SYSTEM, &prompt, MATCH_TEMPERATURE).await?;

    Ok(text.trim().to_string())
}
