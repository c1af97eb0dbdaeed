// User accounts: persistence, profile endpoints and the input
// normalisation shared with signup.

pub mod handlers;
pub mod store;

use reqwest::Url;

const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";

pub const EMAIL_TAKEN: &str = "An account with this email already exists.";
pub const PHONE_TAKEN: &str = "An account with this mobile number already exists.";

/// Partial unique index on `users.phone`, see the init migration.
const PHONE_INDEX: &str = "users_phone_key";

/// Message for a unique violation on `users`, picked by the index that fired.
pub fn duplicate_user_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(PHONE_INDEX) => PHONE_TAKEN,
        _ => EMAIL_TAKEN,
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Trims the phone number; blank input means "no phone".
pub fn normalize_phone(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// Accepts 7–15 digits with the usual separators (`+`, spaces, dashes, parentheses).
pub fn is_valid_phone(phone: &str) -> bool {
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    allowed && (7..=15).contains(&digits)
}

/// Initials avatar generated from the user's name.
pub fn default_avatar_url(name: &str) -> String {
    Url::parse_with_params(
        AVATAR_SERVICE,
        &[("name", name), ("background", "0D8ABC"), ("color", "fff")],
    )
    .map(|url| url.to_string())
    .unwrap_or_else(|_| AVATAR_SERVICE.to_string())
}
