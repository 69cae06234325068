use std::path::{Component, Path as FsPath};

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{error::AppError, AppState};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub size: usize,
}

/// Store the `file` field under the upload directory.
///
/// The client's filename is joined onto the upload directory as sent; it is
/// not sanitized.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or(AppError::MissingUpload)?;
        let contents = field.bytes().await?;

        let path = state.upload_dir.join(&filename);
        tokio::fs::write(&path, &contents).await?;
        tracing::info!(path = %path.display(), size = contents.len(), "upload stored");

        return Ok(Json(UploadResponse {
            url: format!("/uploads/{}", filename),
            size: contents.len(),
        }));
    }
    Err(AppError::MissingUpload)
}

/// Serve a previously uploaded file. Paths leaving the upload directory are
/// reported as missing.
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let relative = FsPath::new(&path);
    if !relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(AppError::NotFound);
    }

    let full = state.upload_dir.join(relative);
    if !tokio::fs::metadata(&full).await.map_err(missing)?.is_file() {
        return Err(AppError::NotFound);
    }
    let contents = tokio::fs::read(&full).await.map_err(missing)?;

    Ok(([(header::CONTENT_TYPE, content_type_for(&full))], contents).into_response())
}

fn missing(e: std::io::Error) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::NotFound
    } else {
        AppError::Io(e)
    }
}

fn content_type_for(path: &FsPath) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("txt") | Some("md") | Some("log") => "text/plain; charset=utf-8",
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript; charset=utf-8",
        Some("csv") => "text/csv; charset=utf-8",
        Some("xml") => "application/xml",
        Some("json") | Some("map") => "application/json",
        Some("yaml") | Some("yml") => "application/yaml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/vnd.microsoft.icon",
        Some("bmp") => "image/bmp",
        Some("avif") => "image/avif",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("tar") => "application/x-tar",
        Some("wasm") => "application/wasm",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        _ => {
            tracing::debug!(path = %path.display(), "no known content type");
            "application/octet-stream"
        }
    }
}
