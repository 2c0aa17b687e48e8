//! Authentication Models
//!
//! Data structures for authentication requests, responses, and user information.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::UserModel;

/// Authenticated user extracted from a validated bearer token
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Signup request payload
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email_id: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
}

impl From<SignupRequest> for UserModel {
    fn from(form: SignupRequest) -> Self {
        Self {
            id: Uuid::nil(),
            email: form.email_id,
            password: form.password,
            first_name: form.first_name,
            last_name: form.last_name,
            username: form.username,
        }
    }
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email_id: String,
    pub password: String,
}

/// Token response after successful authentication
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl TokenResponse {
    pub fn new(token: String, expires_in: u64) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}
