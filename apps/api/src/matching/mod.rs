// Resume ↔ job-description matching: sanitize, build the prompt, ask the LLM.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod handlers;
pub mod prompts;
pub mod scorer;
