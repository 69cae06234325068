use std::convert::Infallible;
use std::fmt;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, Uri},
};
use serde::Serialize;
use serde_json::Value;

use super::{locator, token};

/// Email asserted by a request's token. Self-asserted, never authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve the identity a request claims, if any.
///
/// Decode failures are logged and collapse to `None`; they never fail the
/// request.
pub fn resolve(headers: &HeaderMap, uri: &Uri) -> Option<Identity> {
    let located = locator::locate(headers, uri)?;
    tracing::debug!(source = ?located.source, "session token located");
    resolve_token(&located.token)
}

pub fn resolve_token(raw: &str) -> Option<Identity> {
    let claim = match token::decode(raw) {
        Ok(claim) => claim,
        Err(e) => {
            tracing::error!("Failed to decode session token: {}", e);
            return None;
        }
    };
    match claim.into_insecure_inner().remove("email") {
        Some(Value::String(email)) => Some(Identity(email)),
        _ => None,
    }
}

/// Extractor handing the resolved identity to a handler. Never rejects.
#[derive(Debug, Clone, Default)]
pub struct CurrentIdentity(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentIdentity(resolve(&parts.headers, &parts.uri)))
    }
}
