// Prompt templates and response schemas for the AI features.

use serde_json::{json, Value};

use crate::ai::suggestions::{SuggestionRequest, SuggestionSection};
use crate::llm_client::prompts::RESUME_WRITER_PERSONA;

pub const SCORE_PROMPT_TEMPLATE: &str = "Act as a professional ATS and expert Resume Critic. \
Evaluate the following resume data for ATS compatibility and impact. \
Return JSON with an overall score (0-100), a breakdown (quality, relevance, skills, clarity, ats; each 0-100) \
and 3 specific feedback tips.
{resume_json}";

pub const CHAT_SYSTEM_INSTRUCTION: &str = "You are 'SmartBot', the dedicated AI assistant for 'Smart Resume Builder'. \
Your ONLY purpose is to help users with the Smart Resume Builder application, including its features \
(templates, AI suggestions, scoring, saving drafts), navigation, profile settings, or user issues within the app.

STRICT TOPIC FILTERING:
If the user asks about ANYTHING unrelated to the Smart Resume Builder application (e.g., general knowledge, \
coding help, entertainment, news, math, recipes), you MUST politely decline and respond EXACTLY with this phrase:
\"I'm here to help you with the Smart Resume Builder only. For questions outside this app, please refer to another source. How can I assist you with your resume today?\"

Do not provide information on external topics under any circumstances. \
Always remain professional, focused, and friendly within the context of the application.";

/// Builds the suggestion prompt for one editor section.
pub fn suggestion_prompt(req: &SuggestionRequest) -> String {
    let context = req.context.as_deref().unwrap_or("").trim();
    let mut prompt = String::from(RESUME_WRITER_PERSONA);

    match req.section {
        SuggestionSection::Summary => prompt.push_str(&format!(
            "Generate 3 professional summary variations for a {}. \
             Current draft: \"{}\". \
             Focus on impact, skills, and career trajectory.",
            req.job_title, context
        )),
        SuggestionSection::Experience => prompt.push_str(&format!(
            "Generate 3 professional accomplishment bullet points for the role of {}. \
             Current input: \"{}\". \
             Use strong action verbs, quantify results if possible, and focus on achievements rather than just duties.",
            req.job_title, context
        )),
        SuggestionSection::Education => prompt.push_str(&format!(
            "Generate 3 variations for the \"Achievements and Coursework\" section of a resume entry. \
             Degree context: \"{}\". \
             Include mentions of relevant coursework, honors, GPA if high, or academic projects.",
            context
        )),
    }

    if let Some(target) = non_blank(&req.target_job) {
        prompt.push_str(&format!(" Target Job: {target}."));
    }
    if let Some(industry) = non_blank(&req.industry) {
        prompt.push_str(&format!(" Industry: {industry}."));
    }
    if let Some(tone) = non_blank(&req.tone) {
        prompt.push_str(&format!(" Tone: {tone}."));
    }

    prompt.push_str(" Return exactly 3 distinct, concise suggestions in JSON format.");
    prompt
}

pub fn score_prompt(resume_json: &str) -> String {
    SCORE_PROMPT_TEMPLATE.replace("{resume_json}", resume_json)
}

pub fn suggestion_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "suggestion": { "type": "STRING" }
            },
            "required": ["suggestion"]
        }
    })
}

pub fn score_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "overall": { "type": "INTEGER" },
            "breakdown": {
                "type": "OBJECT",
                "properties": {
                    "quality": { "type": "INTEGER" },
                    "relevance": { "type": "INTEGER" },
                    "skills": { "type": "INTEGER" },
                    "clarity": { "type": "INTEGER" },
                    "ats": { "type": "INTEGER" }
                }
            },
            "feedback": {
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }
        }
    })
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
