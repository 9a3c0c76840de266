// src/utils/session.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{
    config::{Config, SESSION_COOKIE},
    error::AppError,
    models::user::Role,
    utils::{
        cookie::{build_cookie, expired_cookie, read_cookie},
        flash::{Flash, redirect_with_flash},
    },
};

/// Claims carried by the signed session cookie.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    /// Role taken from the stored account, never from the login form.
    pub role: Role,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

/// The authenticated visitor, injected into request extensions by
/// `auth_middleware`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub role: Role,
}

/// Signs a session token for the given account.
pub fn sign_session(
    user_id: i64,
    role: Role,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs()
        + expiration_seconds;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies a session token and returns the session it encodes.
pub fn verify_session(token: &str, secret: &str) -> Result<Session, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid session".to_string()))?;

    let user_id = token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::AuthError("Invalid session".to_string()))?;

    Ok(Session {
        user_id,
        role: token_data.claims.role,
    })
}

/// Decodes the session cookie of a request, if present and valid.
pub fn current_session(headers: &HeaderMap, secret: &str) -> Option<Session> {
    let token = read_cookie(headers, SESSION_COOKIE)?;
    verify_session(&token, secret).ok()
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str, config: &Config) -> String {
    build_cookie(SESSION_COOKIE, token, Some(config.session_expiration))
}

/// `Set-Cookie` value ending the session.
pub fn clear_session_cookie() -> String {
    expired_cookie(SESSION_COOKIE)
}

/// Axum Middleware: Authentication.
///
/// Reads the session cookie. If valid, injects the `Session` into the request
/// extensions for handlers to use; otherwise redirects to the login page.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match current_session(req.headers(), &config.session_secret) {
        Some(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        None => redirect_with_flash("/login", Flash::info("Please log in to access this page.")),
    }
}

/// Axum Middleware: Admin Authorization.
///
/// Must be used AFTER `auth_middleware`. Lets the request through only when the
/// session role may manage content; everyone else is sent home.
pub async fn admin_middleware(req: Request<Body>, next: Next) -> Response {
    let Some(session) = req.extensions().get::<Session>().copied() else {
        return redirect_with_flash("/login", Flash::info("Please log in to access this page."));
    };

    if !session.role.can_manage_content() {
        tracing::warn!(user_id = session.user_id, "non-admin reached an admin route");
        return redirect_with_flash("/", Flash::danger("Access Denied!"));
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header};

    #[test]
    fn signed_session_decodes_to_same_account() {
        let token = sign_session(42, Role::Admin, "secret", 60).unwrap();
        let session = verify_session(&token, "secret").unwrap();

        assert_eq!(
            session,
            Session {
                user_id: 42,
                role: Role::Admin
            }
        );
    }

    #[test]
    fn session_signed_with_another_secret_is_rejected() {
        let token = sign_session(42, Role::User, "secret", 60).unwrap();
        assert!(verify_session(&token, "other-secret").is_err());
    }

    #[test]
    fn session_is_read_from_cookie_header() {
        let token = sign_session(7, Role::User, "secret", 60).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("session={}", token)).unwrap(),
        );

        let session = current_session(&headers, "secret").unwrap();
        assert_eq!(session.user_id, 7);
        assert_eq!(session.role, Role::User);
        assert!(current_session(&HeaderMap::new(), "secret").is_none());
    }
}
