use serde::{Deserialize, Serialize};

use crate::auth::Identity;

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: Option<Identity>,
    pub cookies: Option<String>,
    pub note: &'static str,
}
