// LLM prompt constants for the matching module.

/// System prompt for match scoring.
pub const MATCH_SYSTEM: &str = "You are an expert resume reviewer.";

/// Sampling temperature for match scoring.
pub const MATCH_TEMPERATURE: f32 = 0.7;

/// Builds the ATS review prompt. Inputs are inserted verbatim.
pub fn match_prompt(resume: &str, job_desc: &str) -> String {
    format!(
        "\nAct as an expert resume reviewer specializing in AI/ATS (Applicant Tracking System) \
screening. Evaluate the resume below against the job description and provide:

1. A match score out of 100, based on how well the resume aligns with the job description \
and likely passes automated screening.
2. A brief explanation (2-3 sentences) of the score, focusing on keyword relevance, \
formatting, and overall alignment.
3. 3-5 actionable suggestions to improve the resume's chances of passing AI/ATS filters, \
such as adding missing keywords, improving structure, or clarifying experience.

Resume:
{resume}

Job Description:
{job_desc}
"
    )
}
