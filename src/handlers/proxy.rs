use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{error::AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: String,
}

/// Outbound client for the relay: certificate validation off, short timeout.
pub fn client(timeout: Duration) -> Result<reqwest::Client, AppError> {
    reqwest::Client::builder()
        .danger_accept_invalid_certs(true)
        .timeout(timeout)
        .build()
        .map_err(AppError::HttpClient)
}

/// Fetch `url` and relay its body and content type. No identity is resolved here.
pub async fn proxy(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, AppError> {
    tracing::info!("Proxy fetching: {}", query.url);

    let upstream = state
        .http
        .get(&query.url)
        .send()
        .await
        .map_err(AppError::Upstream)?;
    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("text/plain"));
    let body = upstream.text().await.map_err(AppError::Upstream)?;

    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}
