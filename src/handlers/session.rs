use axum::{
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse},
    Json,
};

use crate::{
    auth::{issuer, CurrentIdentity},
    error::AppError,
    models::session::{AuthResponse, LoginPayload, ProfileResponse},
};

const LOGIN_MESSAGE: &str = "Store this in localStorage!";
const PROFILE_NOTE: &str = "This endpoint trusts any token source.";

pub async fn login(Json(payload): Json<LoginPayload>) -> Result<impl IntoResponse, AppError> {
    let session = issuer::issue(&payload.email, &payload.password)?;

    Ok((
        AppendHeaders([
            (header::SET_COOKIE, session.session_cookie),
            (header::SET_COOKIE, session.alt_session_cookie),
        ]),
        Json(AuthResponse {
            token: session.token,
            message: LOGIN_MESSAGE,
        }),
    ))
}

/// Echoes whoever the request claims to be. Anonymous callers get `user: null`.
pub async fn profile(
    CurrentIdentity(user): CurrentIdentity,
    headers: HeaderMap,
) -> Json<ProfileResponse> {
    let cookies = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    Json(ProfileResponse {
        user,
        cookies,
        note: PROFILE_NOTE,
    })
}
