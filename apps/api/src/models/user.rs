use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Subscription plan. Stored and reported only; nothing is gated on it yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "Free",
            Plan::Pro => "Pro",
        }
    }

    /// Unknown values read back as `Free`; the column has a CHECK constraint.
    pub fn from_db(raw: &str) -> Self {
        match raw {
            "Pro" => Plan::Pro,
            _ => Plan::Free,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub plan: String,
    pub otp_code: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// The user as the browser sees it. Never carries the hash or OTP state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for PublicUser {
    fn from(row: UserRow) -> Self {
        PublicUser {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            avatar: row.avatar,
            location: row.location,
            plan: Plan::from_db(&row.plan),
            created_at: row.created_at,
        }
    }
}
