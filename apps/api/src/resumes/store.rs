//! Resume persistence. Every statement filters on the owner's id, so rows
//! belonging to other users behave exactly like missing rows.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::resume::{
    ResumeInput, ResumeRow, ResumeScore, ResumeStatus, DEFAULT_TEMPLATE_ID, UNTITLED_RESUME,
};

pub async fn insert_resume(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    input: &ResumeInput,
) -> Result<ResumeRow, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (id, user_id, title, template_id, status, thumbnail,
             personal_info, experience, education, skills)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .bind(input.template_id.as_deref().unwrap_or(DEFAULT_TEMPLATE_ID))
    .bind(input.status.unwrap_or_default().as_str())
    .bind(input.thumbnail.as_deref())
    .bind(Json(input.personal_info.clone().unwrap_or_default()))
    .bind(Json(input.experience.clone().unwrap_or_default()))
    .bind(Json(input.education.clone().unwrap_or_default()))
    .bind(input.skills.clone().unwrap_or_default())
    .fetch_one(pool)
    .await
}

/// The owner's resumes, most recently updated first.
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Overwrites the provided fields and bumps `updated_at`.
pub async fn update_owned(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    input: &ResumeInput,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes
        SET title = COALESCE($3, title),
            template_id = COALESCE($4, template_id),
            status = COALESCE($5, status),
            thumbnail = COALESCE($6, thumbnail),
            personal_info = COALESCE($7, personal_info),
            experience = COALESCE($8, experience),
            education = COALESCE($9, education),
            skills = COALESCE($10, skills),
            updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(input.title.as_deref())
    .bind(input.template_id.as_deref())
    .bind(input.status.map(|s| s.as_str()))
    .bind(input.thumbnail.as_deref())
    .bind(input.personal_info.clone().map(Json))
    .bind(input.experience.clone().map(Json))
    .bind(input.education.clone().map(Json))
    .bind(input.skills.clone())
    .fetch_optional(pool)
    .await
}

/// Creates the draft `id` for the owner, or merges into it when it exists.
/// Returns `None` when `id` belongs to another user.
pub async fn upsert_draft(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    input: &ResumeInput,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (id, user_id, title, template_id, status, thumbnail,
             personal_info, experience, education, skills)
        VALUES ($1, $2, COALESCE($3, $10), COALESCE($4, $11), $12, $5,
                COALESCE($6, '{}'::jsonb), COALESCE($7, '[]'::jsonb),
                COALESCE($8, '[]'::jsonb), COALESCE($9, '{}'::text[]))
        ON CONFLICT (id) DO UPDATE
        SET title = COALESCE($3, resumes.title),
            template_id = COALESCE($4, resumes.template_id),
            status = $12,
            thumbnail = COALESCE($5, resumes.thumbnail),
            personal_info = COALESCE($6, resumes.personal_info),
            experience = COALESCE($7, resumes.experience),
            education = COALESCE($8, resumes.education),
            skills = COALESCE($9, resumes.skills),
            updated_at = NOW()
        WHERE resumes.user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(input.title.as_deref())
    .bind(input.template_id.as_deref())
    .bind(input.thumbnail.as_deref())
    .bind(input.personal_info.clone().map(Json))
    .bind(input.experience.clone().map(Json))
    .bind(input.education.clone().map(Json))
    .bind(input.skills.clone())
    .bind(UNTITLED_RESUME)
    .bind(DEFAULT_TEMPLATE_ID)
    .bind(ResumeStatus::Draft.as_str())
    .fetch_optional(pool)
    .await
}

pub async fn set_status(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    status: ResumeStatus,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes
        SET status = $3, updated_at = NOW()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await
}

/// Stores the latest AI score; content is unchanged so `updated_at` is kept.
pub async fn set_score(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    score: &ResumeScore,
) -> Result<Option<ResumeRow>, sqlx::Error> {
    sqlx::query_as::<_, ResumeRow>(
        "UPDATE resumes SET score = $3 WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(id)
    .bind(user_id)
    .bind(Json(score.clone()))
    .fetch_optional(pool)
    .await
}

/// True when a row was deleted.
pub async fn delete_owned(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
