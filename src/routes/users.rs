//! Profile of the authenticated user

use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::{Router, routing::get};
use serde::Deserialize;

use crate::auth::{AuthUser, ProfileUpdate};
use crate::error::ApiError;
use crate::routes::{ApiJson, respond};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let profile = state.auth.find_user(user.id).await?;
    Ok(respond(StatusCode::OK, profile))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(form): ApiJson<UpdateProfileRequest>,
) -> Result<Response, ApiError> {
    let update = ProfileUpdate {
        first_name: form.first_name,
        last_name: form.last_name,
        username: form.username,
    };
    let profile = state.auth.update_profile(user.id, update).await?;
    tracing::info!(user_id = %user.id, "profile updated");
    Ok(respond(StatusCode::OK, profile))
}

/// Routes here expect the auth middleware to be layered on by the caller.
pub fn create_user_routes() -> Router<AppState> {
    Router::new().route("/v1/users/me", get(me).put(update_me))
}

#[cfg(test)]
mod tests {
    use crate::server::testing::TestApp;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_me_requires_token() {
        let app = TestApp::new();
        let (status, json) = app.send(Method::GET, "/v1/users/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);

        let (status, _) = app
            .send(Method::GET, "/v1/users/me", Some("not.a.token"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_returns_profile_without_password() {
        let app = TestApp::new();
        let token = app.login_new_user("ankur@example.com").await;

        let (status, json) = app.send(Method::GET, "/v1/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["email"], "ankur@example.com");
        assert_eq!(json["data"]["first_name"], "Ankur");
        assert!(json["data"].get("password").is_none());
    }

    #[tokio::test]
    async fn test_update_me() {
        let app = TestApp::new();
        let token = app.login_new_user("ankur@example.com").await;

        let body = json!({ "username": "ankur.anand" }).to_string();
        let (status, json) = app
            .send(Method::PUT, "/v1/users/me", Some(&token), Some(&body))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["username"], "ankur.anand");
        assert_eq!(json["data"]["last_name"], "Anand");

        let stored = &app.store.users().await[0];
        assert_eq!(stored.username, "ankur.anand");
        assert_eq!(stored.email, "ankur@example.com");
    }
}
