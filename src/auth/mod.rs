//! Session-based authentication module.
//!
//! Passwords are stored as bcrypt hashes; gated flows resolve a bearer
//! session token to the owning account and fail closed otherwise.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::errors::{codes, AppError, ErrorDetails, ErrorResponse};
use crate::models::User;
use crate::AppState;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Identity of the caller, inserted into request extensions by
/// [`session_auth_layer`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// The session token the request authenticated with.
    pub token: String,
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Check a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Session authentication layer for the gated tag and history flows.
///
/// Resolves `Authorization: Bearer <token>` to a [`CurrentUser`] extension.
/// Requests without a live session are rejected before reaching a handler.
pub async fn session_auth_layer(state: AppState, mut request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    let Some(token) = token else {
        return auth_required_response("Sign in to continue");
    };

    let session = match state.repo.get_session(&token).await {
        Ok(Some(session)) => session,
        Ok(None) => return auth_required_response("Session is invalid or expired"),
        Err(e) => return e.into_response(),
    };

    let user = match state.repo.get_user(&session.user_id).await {
        Ok(Some(user)) => user,
        // Session outlived its account
        Ok(None) => return auth_required_response("Session is invalid or expired"),
        Err(e) => return e.into_response(),
    };

    request.extensions_mut().insert(CurrentUser { user, token });
    next.run(request).await
}

/// Create an authentication-required response.
fn auth_required_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::AUTH_REQUIRED.to_string(),
            message: message.to_string(),
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(!verify_password("incorrect horse battery", &hash));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
