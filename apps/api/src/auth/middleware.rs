use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::{jwt, AuthUser};
use crate::errors::AppError;
use crate::state::AppState;
use crate::users::store;

/// Resolves the caller from `Authorization: Bearer <jwt>` and inserts an
/// `AuthUser` extension. Without a token, development builds fall back to
/// the configured dev user; everything else is rejected with 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = match bearer_token(req.headers()) {
        Some(token) => {
            jwt::validate_token(token, &state.config.jwt_secret)
                .map_err(|e| {
                    debug!("Rejected bearer token: {e}");
                    AppError::Unauthorized("Not authorized, token failed".to_string())
                })?
                .sub
        }
        None => match state.config.dev_fallback_user() {
            Some(id) => {
                debug!("No token supplied, using development user {id}");
                id
            }
            None => return Err(AppError::Unauthorized("Not authorized, no token".to_string())),
        },
    };

    let user = store::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    req.extensions_mut().insert(AuthUser::from(&user));
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_non_bearer_schemes_ignored() {
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers_with("Bearer   ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
