use anyhow::{Context, Result};
use uuid::Uuid;

use crate::llm_client::DEFAULT_API_BASE;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    /// Absent key disables AI routes; they answer "Server missing API Key".
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub app_env: AppEnv,
    /// User impersonated by token-less requests in development.
    pub dev_user_id: Option<Uuid>,
    pub port: u16,
    pub rust_log: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => AppEnv::Development,
            _ => AppEnv::Production,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let dev_user_id = optional_env("DEV_USER_ID")
            .map(|raw| Uuid::parse_str(&raw).context("DEV_USER_ID must be a valid UUID"))
            .transpose()?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            app_env: AppEnv::parse(&optional_env("APP_ENV").unwrap_or_default()),
            dev_user_id,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The user to fall back to when a request carries no token.
    /// Only ever set in development.
    pub fn dev_fallback_user(&self) -> Option<Uuid> {
        match self.app_env {
            AppEnv::Development => self.dev_user_id,
            AppEnv::Production => None,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/resume_test".to_string(),
        jwt_secret: "test-secret-key-at-least-32-bytes-long".to_string(),
        gemini_api_key: None,
        gemini_api_base: DEFAULT_API_BASE.to_string(),
        app_env: AppEnv::Production,
        dev_user_id: None,
        port: 5000,
        rust_log: "debug".to_string(),
    }
}
