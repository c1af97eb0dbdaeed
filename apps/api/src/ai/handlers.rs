//! Axum route handlers for the AI assistant features.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::ai::prompts::CHAT_SYSTEM_INSTRUCTION;
use crate::ai::suggestions::{generate_suggestions, Suggestion, SuggestionRequest};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::llm_client::{ChatTurn, LlmError};
use crate::state::AppState;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEditRequest {
    /// Raw base64 or a `data:<mime>;base64,<payload>` URL.
    pub image_base64: String,
    pub mime_type: Option<String>,
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ImageEditResponse {
    /// `data:<mime>;base64,<payload>` URL of the edited image.
    pub image: String,
}

/// POST /api/ai/suggestions
///
/// Model failures degrade to an empty list so the editor keeps working.
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<SuggestionRequest>,
) -> Result<Json<Vec<Suggestion>>, AppError> {
    if request.needs_job_title() && request.job_title.trim().is_empty() {
        return Err(AppError::Validation("jobTitle is required".to_string()));
    }

    match generate_suggestions(&state.llm, &request).await {
        Ok(suggestions) => Ok(Json(suggestions)),
        Err(LlmError::MissingApiKey) => Err(AppError::AiNotConfigured),
        Err(e) => {
            warn!("Suggestion generation failed for user {}: {e}", user.id);
            Ok(Json(Vec::new()))
        }
    }
}

/// POST /api/ai/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let reply = state
        .llm
        .chat(&request.history, &request.message, CHAT_SYSTEM_INSTRUCTION)
        .await
        .map_err(|e| AppError::from_llm(e, "Chat assistant is unavailable"))?;

    Ok(Json(ChatResponse { reply }))
}

/// POST /api/ai/image-edit
pub async fn handle_image_edit(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(request): AppJson<ImageEditRequest>,
) -> Result<Json<ImageEditResponse>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::Validation("prompt cannot be empty".to_string()));
    }
    let (mime_type, payload) = split_data_url(&request.image_base64, request.mime_type.as_deref());
    if payload.is_empty() {
        return Err(AppError::Validation("imageBase64 cannot be empty".to_string()));
    }

    let image = state
        .llm
        .edit_image(payload, &mime_type, &request.prompt)
        .await
        .map_err(|e| AppError::from_llm(e, "Image edit failed"))?;

    info!("Image edit completed for user {}", user.id);
    Ok(Json(ImageEditResponse {
        image: png_data_url(&image.data),
    }))
}

/// The browser always receives the edited image as a PNG data URL.
fn png_data_url(data: &str) -> String {
    format!("data:image/png;base64,{data}")
}

/// Splits a data URL into (mime, payload). Plain base64 keeps the given
/// mime type, or JPEG when none is given.
fn split_data_url<'a>(raw: &'a str, mime_hint: Option<&str>) -> (String, &'a str) {
    let raw = raw.trim();
    let fallback = mime_hint
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_IMAGE_MIME)
        .to_string();

    match raw
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
    {
        Some((mime, payload)) if !mime.is_empty() => (mime.to_string(), payload),
        Some((_, payload)) => (fallback, payload),
        None => (fallback, raw),
    }
}
