//! Auth routes for signup and login

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Router, routing::post};
use serde_json::json;

use crate::auth::models::{LoginRequest, SignupRequest, TokenResponse};
use crate::auth::{AuthError, AuthService};
use crate::database::StorageError;
use crate::error::ApiError;
use crate::routes::{ApiJson, respond};
use crate::server::AppState;

/// Email and password shape checks shared by signup and login.
/// A failure ends the request before any storage or hashing work.
fn precondition(auth: &AuthService, email: &str, password: &str) -> Result<(), ApiError> {
    if !auth.is_valid_email(email) {
        return Err(ApiError::InvalidEmail);
    }
    if !auth.is_valid_password(password) {
        return Err(ApiError::InvalidPassword);
    }
    Ok(())
}

pub async fn signup(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<SignupRequest>,
) -> Result<Response, ApiError> {
    precondition(&state.auth, &form.email_id, &form.password)?;

    if state.auth.is_duplicate_registration(&form.email_id).await? {
        tracing::warn!("signup rejected: email already registered");
        return Err(ApiError::DuplicateRegistration);
    }

    // a concurrent signup can still win the unique index
    let user_id = match state.auth.store_user(form.into()).await {
        Ok(id) => id,
        Err(AuthError::Storage(StorageError::Duplicate(_))) => {
            return Err(ApiError::DuplicateRegistration);
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(%user_id, "user created");

    Ok(respond(
        StatusCode::CREATED,
        json!({ "message": "Email successfully registered.", "id": user_id }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<LoginRequest>,
) -> Result<Response, ApiError> {
    precondition(&state.auth, &form.email_id, &form.password)?;

    let Some(user) = state
        .auth
        .is_credential_valid(&form.email_id, &form.password)
        .await?
    else {
        tracing::warn!("login rejected: invalid credentials");
        return Err(ApiError::InvalidCredentials);
    };

    let token = state.tokens.generate(user.id).map_err(ApiError::internal)?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(respond(
        StatusCode::CREATED,
        TokenResponse::new(token, state.tokens.validity_secs()),
    ))
}

pub fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/users/signup", post(signup))
        .route("/v1/users/login", post(login))
}
