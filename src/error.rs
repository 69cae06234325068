use std::fmt;

use axum::{
    extract::multipart::MultipartError,
    http::{header::InvalidHeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Sqlx(sqlx::Error),
    Upstream(reqwest::Error),
    HttpClient(reqwest::Error),
    Io(std::io::Error),
    Multipart(MultipartError),
    Header(InvalidHeaderValue),
    MissingCredentials,
    MissingUpload,
    InvalidConfig(String),
    NotFound,
}

impl From<sqlx::Error> for AppError {
    fn from(inner: sqlx::Error) -> Self {
        AppError::Sqlx(inner)
    }
}

impl From<std::io::Error> for AppError {
    fn from(inner: std::io::Error) -> Self {
        AppError::Io(inner)
    }
}

impl From<MultipartError> for AppError {
    fn from(inner: MultipartError) -> Self {
        AppError::Multipart(inner)
    }
}

impl From<InvalidHeaderValue> for AppError {
    fn from(inner: InvalidHeaderValue) -> Self {
        AppError::Header(inner)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Sqlx(e) => write!(f, "database error: {}", e),
            AppError::Upstream(e) => write!(f, "{}", e),
            AppError::HttpClient(e) => write!(f, "failed to build HTTP client: {}", e),
            AppError::Io(e) => write!(f, "io error: {}", e),
            AppError::Multipart(e) => write!(f, "{}", e.body_text()),
            AppError::Header(e) => write!(f, "invalid header value: {}", e),
            AppError::MissingCredentials => f.write_str("Missing credentials"),
            AppError::MissingUpload => f.write_str("Missing file"),
            AppError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            AppError::NotFound => f.write_str("Not Found"),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingCredentials
            | AppError::MissingUpload
            | AppError::InvalidConfig(_)
            | AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Sqlx(_) | AppError::HttpClient(_) | AppError::Io(_) | AppError::Header(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::Sqlx(e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                "Storage error".to_string()
            }
            AppError::HttpClient(_) | AppError::Header(_) => {
                tracing::error!("{}", self);
                "Internal server error".to_string()
            }
            AppError::Upstream(e) => {
                tracing::warn!("Upstream fetch failed: {}", e);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
