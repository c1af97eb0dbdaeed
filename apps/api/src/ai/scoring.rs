//! ATS-style resume scoring, delegated to the text model.

use serde_json::Value;

use crate::ai::prompts::{score_prompt, score_schema};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::resume::ResumeScore;

/// Scores arbitrary resume JSON. Out-of-range numbers are clamped to 0–100.
pub async fn score_resume(llm: &LlmClient, resume_data: &Value) -> Result<ResumeScore, LlmError> {
    let resume_json = serde_json::to_string(resume_data)?;
    llm.call_json(&score_prompt(&resume_json), Some(JSON_ONLY_SYSTEM), score_schema())
        .await
}
