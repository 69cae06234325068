use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use crate::{error::AppError, structured};

#[derive(Debug, Deserialize)]
pub struct EchoForm {
    pub config: String,
}

#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub safe: serde_json::Value,
    #[serde(rename = "unsafe")]
    pub permissive: serde_json::Value,
}

/// Both readings of `config`. Only a document that does not parse at all is
/// rejected; a document the safe reading refuses yields `safe: null`.
pub async fn echo_yaml(Form(form): Form<EchoForm>) -> Result<Json<EchoResponse>, AppError> {
    let permissive = structured::parse_permissive(&form.config).map_err(AppError::InvalidConfig)?;
    let safe = match structured::parse_safe(&form.config) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("safe reading refused config: {}", e);
            serde_json::Value::Null
        }
    };

    Ok(Json(EchoResponse { safe, permissive }))
}
