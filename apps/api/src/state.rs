use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::otp::OtpSender;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub config: Config,
    /// Pluggable OTP delivery. Default: LogOtpSender.
    pub otp_sender: Arc<dyn OtpSender>,
}
