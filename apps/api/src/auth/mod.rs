// Authentication: signup/login, bearer-token middleware and the
// phone-OTP password reset flow.

pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod otp;
pub mod password;

use serde::Serialize;
use uuid::Uuid;

use crate::models::user::{PublicUser, UserRow};

/// The authenticated caller, inserted into request extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
}

impl From<&UserRow> for AuthUser {
    fn from(row: &UserRow) -> Self {
        Self { id: row.id }
    }
}

/// Returned by signup and login: the public user plus a bearer token.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: PublicUser,
    pub token: String,
}
