//! One-time codes for phone-based password reset.
//!
//! The code and its expiry are stored on the user row; `OtpSender` is the
//! delivery seam. The default sender only logs, no SMS provider is wired in.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use tracing::info;

pub const OTP_TTL_MINUTES: i64 = 5;

/// Uniform 6-digit code, 100000–999999.
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000u32).to_string()
}

pub fn otp_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(OTP_TTL_MINUTES)
}

/// True when `submitted` matches the stored code and it has not expired.
pub fn otp_matches(
    stored_code: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
    submitted: &str,
    now: DateTime<Utc>,
) -> bool {
    match (stored_code, expires_at) {
        (Some(code), Some(expires_at)) => code == submitted.trim() && now < expires_at,
        _ => false,
    }
}

#[async_trait]
pub trait OtpSender: Send + Sync {
    async fn send(&self, phone: &str, code: &str) -> anyhow::Result<()>;
}

/// Writes the code to the service log.
pub struct LogOtpSender;

#[async_trait]
impl OtpSender for LogOtpSender {
    async fn send(&self, phone: &str, code: &str) -> anyhow::Result<()> {
        info!("[OTP SENT] To {phone}: {code}");
        Ok(())
    }
}
