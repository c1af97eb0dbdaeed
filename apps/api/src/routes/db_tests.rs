//! Router tests against a real PostgreSQL database.
//!
//! Skipped unless `DATABASE_URL` is set:
//! `DATABASE_URL=postgres://localhost/resume_test cargo test`
//!
//! Every test creates its own users, so they can share one database and run
//! in parallel.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use super::build_router;
use crate::auth::jwt;
use crate::auth::otp::LogOtpSender;
use crate::auth::password::{hash_password, verify_password};
use crate::config::test_config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::{LlmClient, DEFAULT_API_BASE};
use crate::models::resume::{ResumeInput, ResumeScore, ScoreBreakdown};
use crate::models::user::UserRow;
use crate::resumes::store as resumes;
use crate::state::AppState;
use crate::users::store::{self as users, NewUser};
use crate::users::PHONE_TAKEN;

const PASSWORD: &str = "secret123";

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = create_pool(&url).await.expect("Failed to connect to DATABASE_URL");
    run_migrations(&pool).await.expect("Failed to run migrations");
    Some(pool)
}

fn test_app(pool: PgPool) -> Router {
    build_router(AppState {
        db: pool,
        llm: LlmClient::new(None, DEFAULT_API_BASE).unwrap(),
        config: test_config(),
        otp_sender: Arc::new(LogOtpSender),
    })
}

fn unique_phone() -> String {
    let digits = Uuid::new_v4().as_u128() % 10_000_000_000;
    format!("+1 {digits:010}")
}

async fn create_user(pool: &PgPool) -> UserRow {
    let email = format!("{}@example.com", Uuid::new_v4().simple());
    let phone = unique_phone();
    let password_hash = hash_password(PASSWORD).unwrap();
    users::insert_user(
        pool,
        NewUser {
            name: "Test User",
            email: &email,
            phone: Some(&phone),
            password_hash: &password_hash,
            avatar: "",
        },
    )
    .await
    .unwrap()
}

fn token_for(user: &UserRow) -> String {
    jwt::issue_for(user.id, &test_config().jwt_secret).unwrap()
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_resume_crud_round_trip() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool.clone());
    let user = create_user(&pool).await;
    let token = token_for(&user);

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/resume",
        Some(&token),
        Some(json!({"title": "Backend Engineer", "skills": ["Rust", "SQL"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "draft");
    assert_eq!(created["templateId"], "modern-executive");
    assert_eq!(created["userId"], user.id.to_string());
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/resume/{id}");

    let (status, fetched) = call(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Backend Engineer");
    assert_eq!(fetched["skills"], json!(["Rust", "SQL"]));

    let (status, updated) = call(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({"title": "Staff Engineer", "templateId": "classic-blue"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Staff Engineer");
    assert_eq!(updated["templateId"], "classic-blue");
    assert_eq!(updated["skills"], json!(["Rust", "SQL"]));
    assert_ne!(updated["updatedAt"], created["updatedAt"]);

    let (status, _) = call(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({"templateId": "no-such-template"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Resume deleted");

    let (status, body) = call(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Resume not found");
}

#[tokio::test]
async fn test_other_users_resume_reads_as_not_found() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool.clone());
    let owner = create_user(&pool).await;
    let intruder = create_user(&pool).await;
    let owner_token = token_for(&owner);
    let intruder_token = token_for(&intruder);

    let (_, created) = call(
        &app,
        Method::POST,
        "/api/resume",
        Some(&owner_token),
        Some(json!({"title": "Private"})),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();
    let uri = format!("/api/resume/{id}");

    let attempts = [
        (Method::GET, uri.clone(), None),
        (Method::PUT, uri.clone(), Some(json!({"title": "Hijacked"}))),
        (Method::PUT, format!("{uri}/finalize"), None),
        (Method::DELETE, uri.clone(), None),
        (
            Method::POST,
            "/api/resume/save-draft".to_string(),
            Some(json!({"id": id, "title": "Hijacked"})),
        ),
        (
            Method::POST,
            "/api/resume/score".to_string(),
            Some(json!({"resumeId": id})),
        ),
    ];
    for (method, uri, body) in attempts {
        let (status, response) = call(&app, method.clone(), &uri, Some(&intruder_token), body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(response["message"], "Resume not found");
    }

    let (status, intruder_list) = call(&app, Method::GET, "/api/resume", Some(&intruder_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(intruder_list, json!([]));

    let (status, untouched) = call(&app, Method::GET, &uri, Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(untouched["title"], "Private");
    assert_eq!(untouched["status"], "draft");
}

#[tokio::test]
async fn test_save_draft_creates_then_merges() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool.clone());
    let user = create_user(&pool).await;
    let token = token_for(&user);

    let (status, draft) = call(
        &app,
        Method::POST,
        "/api/resume/save-draft",
        Some(&token),
        Some(json!({"id": "new", "skills": ["Go"], "personalInfo": {"fullName": "Ada"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["title"], "Untitled Resume");
    assert_eq!(draft["status"], "draft");
    let id = draft["id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, Method::PUT, &format!("/api/resume/{id}/finalize"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, merged) = call(
        &app,
        Method::POST,
        "/api/resume/save-draft",
        Some(&token),
        Some(json!({"id": id, "title": "Named Draft"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(merged["id"], id.as_str());
    assert_eq!(merged["title"], "Named Draft");
    assert_eq!(merged["status"], "draft");
    assert_eq!(merged["skills"], json!(["Go"]));
    assert_eq!(merged["personalInfo"]["fullName"], "Ada");

    // A client-generated id that is not stored yet is created under that id.
    let fresh = Uuid::new_v4().to_string();
    let (status, created) = call(
        &app,
        Method::POST,
        "/api/resume/save-draft",
        Some(&token),
        Some(json!({"id": fresh, "title": "Offline Draft"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["id"], fresh.as_str());

    let (_, list) = call(&app, Method::GET, "/api/resume", Some(&token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_puts_recently_updated_first() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool.clone());
    let user = create_user(&pool).await;
    let token = token_for(&user);

    let mut ids = Vec::new();
    for title in ["First", "Second"] {
        let (_, created) = call(&app, Method::POST, "/api/resume", Some(&token), Some(json!({"title": title}))).await;
        ids.push(created["id"].as_str().unwrap().to_string());
    }

    let (_, list) = call(&app, Method::GET, "/api/resume", Some(&token), None).await;
    assert_eq!(list[0]["id"], ids[1].as_str());

    call(
        &app,
        Method::PUT,
        &format!("/api/resume/{}", ids[0]),
        Some(&token),
        Some(json!({"title": "First, edited"})),
    )
    .await;

    let (_, list) = call(&app, Method::GET, "/api/resume", Some(&token), None).await;
    assert_eq!(list[0]["id"], ids[0].as_str());
    assert_eq!(list[1]["id"], ids[1].as_str());
}

#[tokio::test]
async fn test_saved_score_keeps_updated_at() {
    let Some(pool) = test_pool().await else { return };
    let user = create_user(&pool).await;
    let input = ResumeInput::default();
    let row = resumes::insert_resume(&pool, user.id, "Scored", &input).await.unwrap();

    let score = ResumeScore {
        overall: 81,
        breakdown: ScoreBreakdown {
            ats: 90,
            ..Default::default()
        },
        feedback: vec!["Quantify impact".into()],
    };
    let scored = resumes::set_score(&pool, row.id, user.id, &score)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(scored.updated_at, row.updated_at);
    assert_eq!(scored.score.map(|s| s.0), Some(score.clone()));

    let stranger = create_user(&pool).await;
    let denied = resumes::set_score(&pool, row.id, stranger.id, &score).await.unwrap();
    assert!(denied.is_none());
}

// ────────────────────────────────────────────────────────────────────────────
// Auth
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_signup_then_login() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool.clone());
    let local = Uuid::new_v4().simple().to_string();
    let phone = unique_phone();

    let (status, signed_up) = call(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({"name": "Ada", "email": format!(" {local}@Example.COM "), "password": PASSWORD, "phone": phone})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(signed_up["email"], format!("{local}@example.com"));
    assert_eq!(signed_up["plan"], "Free");
    assert!(signed_up["token"].is_string());
    assert!(signed_up.get("passwordHash").is_none());

    let (status, logged_in) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": format!("{local}@example.com"), "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged_in["id"], signed_up["id"]);

    let token = logged_in["token"].as_str().unwrap().to_string();
    let (status, profile) = call(&app, Method::GET, "/api/users/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["phone"], phone.as_str());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({"name": "Eve", "email": format!("other-{local}@example.com"), "password": PASSWORD, "phone": phone})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], PHONE_TAKEN);
}

#[tokio::test]
async fn test_otp_reset_is_single_use() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool.clone());
    let user = create_user(&pool).await;
    let phone = user.phone.clone().unwrap();

    let (status, _) = call(&app, Method::POST, "/api/auth/send-otp", None, Some(json!({"phone": phone}))).await;
    assert_eq!(status, StatusCode::OK);

    let stored = users::find_by_id(&pool, user.id).await.unwrap().unwrap();
    let code = stored.otp_code.unwrap();
    assert!(stored.otp_expires_at.unwrap() > Utc::now());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/auth/verify-otp",
        None,
        Some(json!({"phone": phone, "code": "000000"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired OTP. Please try again.");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/auth/verify-otp",
        None,
        Some(json!({"phone": phone, "code": code})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let reset = json!({"phone": phone, "code": code, "password": "brand-new-pass"});
    let (status, body) = call(&app, Method::PUT, "/api/auth/reset-password", None, Some(reset.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password reset successfully");

    let (status, body) = call(&app, Method::PUT, "/api/auth/reset-password", None, Some(reset)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unauthorized reset attempt");

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": user.email, "password": "brand-new-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_resets_spend_the_code_once() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool.clone());
    let user = create_user(&pool).await;
    let phone = user.phone.clone().unwrap();
    users::set_otp(&pool, user.id, "123456", Utc::now() + Duration::minutes(5))
        .await
        .unwrap();

    let first = json!({"phone": phone, "code": "123456", "password": "first-password"});
    let second = json!({"phone": phone, "code": "123456", "password": "second-password"});
    let ((status_a, _), (status_b, _)) = tokio::join!(
        call(&app, Method::PUT, "/api/auth/reset-password", None, Some(first)),
        call(&app, Method::PUT, "/api/auth/reset-password", None, Some(second)),
    );

    let successes = [status_a, status_b]
        .iter()
        .filter(|s| **s == StatusCode::OK)
        .count();
    assert_eq!(successes, 1);
    assert!([status_a, status_b].contains(&StatusCode::BAD_REQUEST));

    let stored = users::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.otp_code.is_none());
    let winner = if status_a == StatusCode::OK { "first-password" } else { "second-password" };
    assert!(verify_password(winner, &stored.password_hash).unwrap());
}

#[tokio::test]
async fn test_expired_otp_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let app = test_app(pool.clone());
    let user = create_user(&pool).await;
    let phone = user.phone.clone().unwrap();
    users::set_otp(&pool, user.id, "654321", Utc::now() - Duration::seconds(1))
        .await
        .unwrap();

    let (status, _) = call(
        &app,
        Method::POST,
        "/api/auth/verify-otp",
        None,
        Some(json!({"phone": phone, "code": "654321"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &app,
        Method::PUT,
        "/api/auth/reset-password",
        None,
        Some(json!({"phone": phone, "code": "654321", "password": "whatever-123"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Unauthorized reset attempt");
}
