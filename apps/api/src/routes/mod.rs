pub mod health;

#[cfg(test)]
mod db_tests;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::ai::handlers as ai;
use crate::auth::handlers as auth;
use crate::auth::middleware::require_auth;
use crate::resumes::handlers as resumes;
use crate::state::AppState;
use crate::templates::handle_list_templates;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        // Resume API
        .route(
            "/api/resume",
            post(resumes::handle_create).get(resumes::handle_list),
        )
        .route("/api/resume/score", post(resumes::handle_score))
        .route("/api/resume/save-draft", post(resumes::handle_save_draft))
        .route(
            "/api/resume/:id",
            get(resumes::handle_get)
                .put(resumes::handle_update)
                .delete(resumes::handle_delete),
        )
        .route("/api/resume/:id/finalize", put(resumes::handle_finalize))
        // User API
        .route(
            "/api/users/profile",
            get(users::handle_get_profile).put(users::handle_update_profile),
        )
        .route("/api/users/password", put(users::handle_change_password))
        // AI API
        .route("/api/ai/suggestions", post(ai::handle_suggestions))
        .route("/api/ai/chat", post(ai::handle_chat))
        .route("/api/ai/image-edit", post(ai::handle_image_edit))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/templates", get(handle_list_templates))
        // Auth API
        .route("/api/auth/signup", post(auth::handle_signup))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/send-otp", post(auth::handle_send_otp))
        .route("/api/auth/verify-otp", post(auth::handle_verify_otp))
        .route("/api/auth/reset-password", put(auth::handle_reset_password))
        .merge(protected)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::otp::LogOtpSender;
    use crate::config::test_config;
    use crate::llm_client::{LlmClient, DEFAULT_API_BASE};

    /// State whose pool never connects; every request below is answered
    /// before a query would run.
    fn test_app() -> Router {
        let config = test_config();
        let state = AppState {
            db: PgPoolOptions::new()
                .connect_lazy(&config.database_url)
                .unwrap(),
            llm: LlmClient::new(None, DEFAULT_API_BASE).unwrap(),
            config,
            otp_sender: Arc::new(LogOtpSender),
        };
        build_router(state)
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_templates_are_public_and_filterable() {
        let (status, body) = send(
            Request::get("/api/templates?category=Creative")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["id"], "creative-pro");
    }

    #[tokio::test]
    async fn test_resume_routes_require_token() {
        let (status, body) = send(Request::get("/api/resume").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not authorized, no token");
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_bad_token_rejected() {
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/api/resume/00000000-0000-0000-0000-000000000000/finalize")
            .header(header::AUTHORIZATION, "Bearer not-a-real-token")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not authorized, token failed");
    }

    #[tokio::test]
    async fn test_ai_routes_require_token() {
        let request = json_request(
            Method::POST,
            "/api/ai/chat",
            json!({"history": [], "message": "hello"}),
        );
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signup_rejects_short_password() {
        let request = json_request(
            Method::POST,
            "/api/auth/signup",
            json!({"name": "Ada", "email": "ada@example.com", "password": "123"}),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Password must be at least 6 characters.");
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_email() {
        let request = json_request(
            Method::POST,
            "/api/auth/signup",
            json!({"name": "Ada", "email": "not-an-email", "password": "secret1"}),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Please enter a valid email address.");
    }

    #[tokio::test]
    async fn test_signup_requires_all_fields() {
        let request = json_request(
            Method::POST,
            "/api/auth/signup",
            json!({"email": "ada@example.com", "password": "secret1"}),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "All fields are required.");
    }

    #[tokio::test]
    async fn test_signup_rejects_bad_phone() {
        let request = json_request(
            Method::POST,
            "/api/auth/signup",
            json!({"name": "Ada", "email": "ada@example.com", "password": "secret1", "phone": "call me"}),
        );
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_requires_credentials() {
        let request = json_request(Method::POST, "/api/auth/login", json!({"email": "  "}));
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_send_otp_requires_phone() {
        let request = json_request(Method::POST, "/api/auth/send-otp", json!({"phone": " "}));
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Mobile number is required.");
    }

    #[tokio::test]
    async fn test_reset_password_checks_length_first() {
        let request = json_request(
            Method::PUT,
            "/api/auth/reset-password",
            json!({"phone": "+1 5550000000", "code": "123456", "password": "abc"}),
        );
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Password must be at least 6 characters.");
    }

    #[tokio::test]
    async fn test_malformed_json_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_missing_field_gets_json_error_body() {
        let request = json_request(Method::POST, "/api/auth/send-otp", json!({}));
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("phone"));
    }
}
