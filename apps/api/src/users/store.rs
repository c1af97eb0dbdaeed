//! User persistence. Every query here is a single statement.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{Plan, UserRow};

pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub password_hash: &'a str,
    pub avatar: &'a str,
}

/// Profile fields to overwrite; `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_phone(pool: &PgPool, phone: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE phone = $1")
        .bind(phone)
        .fetch_optional(pool)
        .await
}

pub async fn insert_user(pool: &PgPool, user: NewUser<'_>) -> Result<UserRow, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, name, email, phone, password_hash, avatar, plan)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.name)
    .bind(user.email)
    .bind(user.phone)
    .bind(user.password_hash)
    .bind(user.avatar)
    .bind(Plan::default().as_str())
    .fetch_one(pool)
    .await
}

pub async fn set_otp(
    pool: &PgPool,
    id: Uuid,
    code: &str,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET otp_code = $2, otp_expires_at = $3, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(code)
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Replaces the password hash and clears any outstanding OTP.
pub async fn set_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET password_hash = $2, otp_code = NULL, otp_expires_at = NULL, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(password_hash)
    .execute(pool)
    .await?;
    Ok(())
}

/// Spends a valid OTP and sets the new hash in one statement, so a code
/// can reset the password at most once. `None` when no unexpired code
/// matches.
pub async fn reset_password_with_otp(
    pool: &PgPool,
    phone: &str,
    code: &str,
    password_hash: &str,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        UPDATE users
        SET password_hash = $3, otp_code = NULL, otp_expires_at = NULL, updated_at = NOW()
        WHERE phone = $1 AND otp_code = $2 AND otp_expires_at > NOW()
        RETURNING id
        "#,
    )
    .bind(phone)
    .bind(code.trim())
    .bind(password_hash)
    .fetch_optional(pool)
    .await
}

pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    changes: &ProfileChanges,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            location = COALESCE($5, location),
            avatar = COALESCE($6, avatar),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes.name.as_deref())
    .bind(changes.email.as_deref())
    .bind(changes.phone.as_deref())
    .bind(changes.location.as_deref())
    .bind(changes.avatar.as_deref())
    .fetch_optional(pool)
    .await
}
