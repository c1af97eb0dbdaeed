//! Axum route handlers for `/api/resume/*`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::ai::scoring::score_resume;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::resume::{Resume, ResumeInput, ResumeScore, ResumeStatus, UNTITLED_RESUME};
use crate::models::MessageResponse;
use crate::resumes::store;
use crate::resumes::validation::{normalize, require_title, validate_fields};
use crate::state::AppState;

const NOT_FOUND: &str = "Resume not found";

#[derive(Debug, Deserialize)]
pub struct SaveDraftRequest {
    /// Existing resume id; anything that is not a UUID (e.g. "new") starts a new draft.
    pub id: Option<String>,
    #[serde(flatten)]
    pub data: ResumeInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRequest {
    /// Resume content to score, as edited in the browser.
    pub resume_data: Option<Value>,
    /// Stored resume to score and to attach the result to.
    pub resume_id: Option<Uuid>,
}

/// POST /api/resume
pub async fn handle_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(mut input): AppJson<ResumeInput>,
) -> Result<(StatusCode, Json<Resume>), AppError> {
    normalize(&mut input);
    validate_fields(&input)?;
    let title = require_title(&input)?;

    let row = store::insert_resume(&state.db, user.id, title, &input).await?;
    info!("Created resume {} for user {}", row.id, user.id);
    Ok((StatusCode::CREATED, Json(Resume::from(row))))
}

/// GET /api/resume
pub async fn handle_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<Resume>>, AppError> {
    let rows = store::list_for_user(&state.db, user.id).await?;
    Ok(Json(rows.into_iter().map(Resume::from).collect()))
}

/// GET /api/resume/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Resume>, AppError> {
    let id = parse_resume_id(&id)?;
    let row = store::find_owned(&state.db, id, user.id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(Resume::from(row)))
}

/// PUT /api/resume/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(mut input): AppJson<ResumeInput>,
) -> Result<Json<Resume>, AppError> {
    let id = parse_resume_id(&id)?;
    normalize(&mut input);
    validate_fields(&input)?;

    let row = store::update_owned(&state.db, id, user.id, &input)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(Resume::from(row)))
}

/// DELETE /api/resume/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_resume_id(&id)?;
    if !store::delete_owned(&state.db, id, user.id).await? {
        return Err(not_found());
    }
    info!("Deleted resume {id} for user {}", user.id);
    Ok(Json(MessageResponse::new("Resume deleted")))
}

/// POST /api/resume/save-draft
///
/// Upserts when `id` is a resume id, otherwise creates a new draft.
/// The result is always in `draft` status.
pub async fn handle_save_draft(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(req): AppJson<SaveDraftRequest>,
) -> Result<Json<Resume>, AppError> {
    let mut input = req.data;
    normalize(&mut input);
    // Drafts may be saved before the title is typed.
    input.title = input.title.filter(|t| !t.is_empty());
    input.status = Some(ResumeStatus::Draft);
    validate_fields(&input)?;

    let existing_id = req.id.as_deref().and_then(|raw| Uuid::parse_str(raw.trim()).ok());

    let row = match existing_id {
        Some(id) => store::upsert_draft(&state.db, id, user.id, &input)
            .await?
            .ok_or_else(not_found)?,
        None => {
            let title = input.title.clone().unwrap_or_else(|| UNTITLED_RESUME.to_string());
            store::insert_resume(&state.db, user.id, &title, &input).await?
        }
    };

    Ok(Json(Resume::from(row)))
}

/// PUT /api/resume/:id/finalize
pub async fn handle_finalize(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Resume>, AppError> {
    let id = parse_resume_id(&id)?;
    let row = store::set_status(&state.db, id, user.id, ResumeStatus::Final)
        .await?
        .ok_or_else(not_found)?;
    info!("Finalized resume {id} for user {}", user.id);
    Ok(Json(Resume::from(row)))
}

/// POST /api/resume/score
///
/// Scores `resumeData`, or the stored resume named by `resumeId` when no
/// data is sent. With a `resumeId` the score is also saved on that resume.
pub async fn handle_score(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(req): AppJson<ScoreRequest>,
) -> Result<Json<ResumeScore>, AppError> {
    // Ownership is settled before any AI call.
    let stored = match req.resume_id {
        Some(id) => Some(
            store::find_owned(&state.db, id, user.id)
                .await?
                .ok_or_else(not_found)?,
        ),
        None => None,
    };

    let resume_data = match (req.resume_data.filter(|d| !d.is_null()), stored) {
        (Some(data), _) => data,
        (None, Some(row)) => serde_json::to_value(Resume::from(row)).map_err(anyhow::Error::from)?,
        (None, None) => {
            return Err(AppError::Validation(
                "resumeData or resumeId is required".to_string(),
            ))
        }
    };

    if !state.llm.is_configured() {
        return Err(AppError::AiNotConfigured);
    }

    let score = score_resume(&state.llm, &resume_data)
        .await
        .map_err(|e| AppError::from_llm(e, "AI Scoring failed"))?;

    if let Some(id) = req.resume_id {
        store::set_score(&state.db, id, user.id, &score)
            .await?
            .ok_or_else(not_found)?;
    }

    Ok(Json(score))
}

fn not_found() -> AppError {
    AppError::NotFound(NOT_FOUND.to_string())
}

/// Malformed ids cannot name a stored resume, so they read as not found.
fn parse_resume_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| not_found())
}
