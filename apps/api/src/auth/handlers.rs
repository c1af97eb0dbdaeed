//! Axum route handlers for `/api/auth/*`.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::auth::otp::{generate_otp, otp_expiry, otp_matches};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{jwt, AuthResponse};
use crate::db::{constraint_name, is_unique_violation};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::{PublicUser, UserRow};
use crate::models::MessageResponse;
use crate::state::AppState;
use crate::users::store::{self, NewUser};
use crate::users::{
    default_avatar_url, duplicate_user_message, is_valid_phone, normalize_email, normalize_phone,
    EMAIL_TAKEN, PHONE_TAKEN,
};

const INVALID_PHONE: &str = "Please enter a valid mobile number.";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,

    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    pub phone: String,
    pub code: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    AppJson(mut req): AppJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    req.name = req.name.trim().to_string();
    req.email = normalize_email(&req.email);
    if req.name.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("All fields are required.".to_string()));
    }
    req.validate()?;

    let phone = normalize_phone(req.phone.as_deref());
    if let Some(phone) = &phone {
        if !is_valid_phone(phone) {
            return Err(AppError::Validation(INVALID_PHONE.to_string()));
        }
    }

    if store::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(AppError::Validation(EMAIL_TAKEN.to_string()));
    }
    if let Some(phone) = &phone {
        if store::find_by_phone(&state.db, phone).await?.is_some() {
            return Err(AppError::Validation(PHONE_TAKEN.to_string()));
        }
    }

    let password_hash = hash_password(&req.password).map_err(anyhow::Error::from)?;
    let avatar = default_avatar_url(&req.name);

    let user = store::insert_user(
        &state.db,
        NewUser {
            name: &req.name,
            email: &req.email,
            phone: phone.as_deref(),
            password_hash: &password_hash,
            avatar: &avatar,
        },
    )
    .await
    .map_err(|e| {
        // Lost a race with a concurrent signup for the same email or phone.
        if is_unique_violation(&e) {
            AppError::Validation(duplicate_user_message(constraint_name(&e)).to_string())
        } else {
            AppError::Database(e)
        }
    })?;

    info!("New user {} signed up", user.id);
    Ok((StatusCode::CREATED, Json(auth_response(&state, user)?)))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("Email and password are required.".to_string()));
    }

    let user = store::find_by_email(&state.db, &email).await?.ok_or_else(|| {
        AppError::NotFound("You must sign up first — this account doesn’t exist.".to_string())
    })?;

    let matches = verify_password(&req.password, &user.password_hash).map_err(anyhow::Error::from)?;
    if !matches {
        return Err(AppError::Unauthorized(
            "Incorrect password. Please try again.".to_string(),
        ));
    }

    Ok(Json(auth_response(&state, user)?))
}

/// POST /api/auth/send-otp
pub async fn handle_send_otp(
    State(state): State<AppState>,
    AppJson(req): AppJson<SendOtpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let phone = required_phone(&req.phone)?;

    let user = store::find_by_phone(&state.db, &phone).await?.ok_or_else(|| {
        AppError::NotFound("No account found with this mobile number.".to_string())
    })?;

    let code = generate_otp();
    store::set_otp(&state.db, user.id, &code, otp_expiry(Utc::now())).await?;
    state.otp_sender.send(&phone, &code).await?;

    Ok(Json(MessageResponse::new(
        "OTP sent to your verified mobile number",
    )))
}

/// POST /api/auth/verify-otp
pub async fn handle_verify_otp(
    State(state): State<AppState>,
    AppJson(req): AppJson<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let phone = required_phone(&req.phone)?;

    find_with_valid_otp(&state, &phone, &req.code)
        .await?
        .ok_or_else(|| {
            AppError::Validation("Invalid or expired OTP. Please try again.".to_string())
        })?;

    Ok(Json(MessageResponse::new("OTP verified successfully")))
}

/// PUT /api/auth/reset-password
pub async fn handle_reset_password(
    State(state): State<AppState>,
    AppJson(req): AppJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let phone = required_phone(&req.phone)?;
    req.validate()?;

    let password_hash = hash_password(&req.password).map_err(anyhow::Error::from)?;
    let user_id = store::reset_password_with_otp(&state.db, &phone, &req.code, &password_hash)
        .await?
        .ok_or_else(|| AppError::Validation("Unauthorized reset attempt".to_string()))?;

    info!("Password reset via OTP for user {user_id}");
    Ok(Json(MessageResponse::new("Password reset successfully")))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn auth_response(state: &AppState, user: UserRow) -> Result<AuthResponse, AppError> {
    let token = jwt::issue_for(user.id, &state.config.jwt_secret).map_err(anyhow::Error::from)?;
    Ok(AuthResponse {
        user: PublicUser::from(user),
        token,
    })
}

fn required_phone(raw: &str) -> Result<String, AppError> {
    normalize_phone(Some(raw))
        .ok_or_else(|| AppError::Validation("Mobile number is required.".to_string()))
}

async fn find_with_valid_otp(
    state: &AppState,
    phone: &str,
    code: &str,
) -> Result<Option<UserRow>, AppError> {
    let user = store::find_by_phone(&state.db, phone).await?;
    Ok(user.filter(|u| {
        otp_matches(
            u.otp_code.as_deref(),
            u.otp_expires_at,
            code,
            Utc::now(),
        )
    }))
}
