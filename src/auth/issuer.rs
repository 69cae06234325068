use axum::http::HeaderValue;

use super::{locator::SESSION_COOKIE, token};
use crate::error::AppError;

pub const ALT_SESSION_COOKIE: &str = "alt_session";

/// A freshly minted token and the two `Set-Cookie` values that carry it.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    /// `session` cookie: readable from script, sent cross-site, not secure-only.
    pub session_cookie: HeaderValue,
    /// `alt_session` cookie. Its `http_only` attribute is not the `HttpOnly`
    /// directive, so browsers treat this cookie as script-readable too.
    pub alt_session_cookie: HeaderValue,
}

/// Mint a session for whoever claims `email`. The password is required to be
/// present and is otherwise ignored.
pub fn issue(email: &str, password: &str) -> Result<IssuedSession, AppError> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::MissingCredentials);
    }

    let token = token::encode(email);
    let session_cookie = HeaderValue::try_from(format!(
        "{}={}; Path=/; SameSite=None",
        SESSION_COOKIE, token
    ))?;
    let alt_session_cookie = HeaderValue::try_from(format!(
        "{}={}; Path=/; http_only=True",
        ALT_SESSION_COOKIE, token
    ))?;

    tracing::info!(email, "session issued");
    Ok(IssuedSession {
        token,
        session_cookie,
        alt_session_cookie,
    })
}
