//! Axum route handlers for `/api/users/*`.

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use crate::auth::AuthUser;
use crate::db::{constraint_name, is_unique_violation};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::PublicUser;
use crate::models::MessageResponse;
use crate::state::AppState;
use crate::users::store::{self, ProfileChanges};
use crate::users::{
    duplicate_user_message, is_valid_phone, normalize_email, normalize_phone, EMAIL_TAKEN,
    PHONE_TAKEN,
};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters."))]
    pub name: Option<String>,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
}

impl UpdateProfileRequest {
    /// Trims text fields and lowercases the email before validation.
    fn normalized(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        Self {
            name: trim(self.name),
            email: self.email.map(|e| normalize_email(&e)),
            phone: normalize_phone(self.phone.as_deref()),
            location: trim(self.location),
            avatar: trim(self.avatar).filter(|a| !a.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current: String,
    pub next: String,
}

/// GET /api/users/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PublicUser>, AppError> {
    let row = store::find_by_id(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(PublicUser::from(row)))
}

/// PUT /api/users/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> Result<Json<PublicUser>, AppError> {
    let req = req.normalized();
    req.validate()?;

    if let Some(phone) = &req.phone {
        if !is_valid_phone(phone) {
            return Err(AppError::Validation("Please enter a valid mobile number.".to_string()));
        }
        if let Some(other) = store::find_by_phone(&state.db, phone).await? {
            if other.id != user.id {
                return Err(AppError::Validation(PHONE_TAKEN.to_string()));
            }
        }
    }
    if let Some(email) = &req.email {
        if let Some(other) = store::find_by_email(&state.db, email).await? {
            if other.id != user.id {
                return Err(AppError::Validation(EMAIL_TAKEN.to_string()));
            }
        }
    }

    let changes = ProfileChanges {
        name: req.name,
        email: req.email,
        phone: req.phone,
        location: req.location,
        avatar: req.avatar,
    };

    let row = store::update_profile(&state.db, user.id, &changes)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Validation(duplicate_user_message(constraint_name(&e)).to_string())
            } else {
                AppError::Database(e)
            }
        })?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(PublicUser::from(row)))
}

/// PUT /api/users/password
pub async fn handle_change_password(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    if req.next.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters."
        )));
    }

    let row = store::find_by_id(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let matches = verify_password(&req.current, &row.password_hash).map_err(anyhow::Error::from)?;
    if !matches {
        return Err(AppError::Unauthorized(
            "Current password is incorrect.".to_string(),
        ));
    }

    let password_hash = hash_password(&req.next).map_err(anyhow::Error::from)?;
    store::set_password(&state.db, user.id, &password_hash).await?;

    info!("Password changed for user {}", user.id);
    Ok(Json(MessageResponse::new("Password updated successfully")))
}
