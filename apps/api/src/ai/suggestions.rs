//! Writing suggestions for the editor's summary, experience and education sections.

use serde::{Deserialize, Serialize};

use crate::ai::prompts::{suggestion_prompt, suggestion_schema};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSection {
    Summary,
    Experience,
    Education,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    #[serde(default)]
    pub job_title: String,
    pub section: SuggestionSection,
    pub context: Option<String>,
    pub target_job: Option<String>,
    pub industry: Option<String>,
    pub tone: Option<String>,
}

impl SuggestionRequest {
    /// Education suggestions work from the degree alone; the others need a job title.
    pub fn needs_job_title(&self) -> bool {
        self.section != SuggestionSection::Education
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Suggestion {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct RawSuggestion {
    pub suggestion: String,
}

pub async fn generate_suggestions(
    llm: &LlmClient,
    request: &SuggestionRequest,
) -> Result<Vec<Suggestion>, LlmError> {
    let prompt = suggestion_prompt(request);
    let raw: Vec<RawSuggestion> = llm
        .call_json(&prompt, Some(JSON_ONLY_SYSTEM), suggestion_schema())
        .await?;

    Ok(label_suggestions(raw, chrono::Utc::now().timestamp_millis()))
}

/// Assigns `sug-<index>-<millis>` ids, one per returned item.
pub fn label_suggestions(raw: Vec<RawSuggestion>, now_millis: i64) -> Vec<Suggestion> {
    raw.into_iter()
        .enumerate()
        .map(|(index, r)| Suggestion {
            id: format!("sug-{index}-{now_millis}"),
            text: r.suggestion.trim().to_string(),
        })
        .collect()
}
