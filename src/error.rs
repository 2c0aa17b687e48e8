//! HTTP-facing errors.
//!
//! Every handler returns `Result<_, ApiError>`. Internal causes are logged
//! here and replaced by a generic message so nothing about storage, hashing
//! or keys leaks to the client.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::database::StorageError;
use crate::services::TodoError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request.")]
    InvalidJson(#[source] JsonRejection),
    #[error("Invalid email address.")]
    InvalidEmail,
    #[error("Invalid Password Length should be > 8 and < 254.")]
    InvalidPassword,
    #[error("Email ID already registered.")]
    DuplicateRegistration,
    #[error("Invalid credentials.")]
    InvalidCredentials,
    #[error("Unauthorized.")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} not found.")]
    NotFound(&'static str),
    #[error("Service unavailable.")]
    Unavailable,
    #[error("Something went wrong.")]
    Internal(#[source] BoxError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidEmail | Self::InvalidPassword => StatusCode::PRECONDITION_FAILED,
            Self::DuplicateRegistration => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal(e: impl Into<BoxError>) -> Self {
        Self::Internal(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Internal(source) => tracing::error!(error = %source, "internal error"),
            Self::InvalidJson(rejection) => {
                tracing::warn!(error = %rejection, "rejected request body")
            }
            _ => tracing::debug!(%status, error = %self, "request failed"),
        }

        let body = json!({
            "success": false,
            "errors": [{ "message": self.to_string() }],
        });
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidJson(rejection)
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::UserNotFound => Self::NotFound("User"),
            StorageError::TodoNotFound => Self::NotFound("Todo"),
            other => Self::internal(other),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Storage(storage) => storage.into(),
            hash @ AuthError::Hash(_) => Self::internal(hash),
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(e: TodoError) -> Self {
        match e {
            TodoError::EmptyFields | TodoError::NilId => Self::BadRequest(e.to_string()),
            TodoError::NotFound => Self::NotFound("Todo"),
            TodoError::Storage(storage) => storage.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidEmail.status(), StatusCode::PRECONDITION_FAILED);
        assert_eq!(ApiError::DuplicateRegistration.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            ApiError::from(TodoError::EmptyFields).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StorageError::TodoNotFound).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_internal_detail_is_hidden() {
        let err = ApiError::from(StorageError::Duplicate("users_email_id_key".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("Something went wrong."));
        assert!(!text.contains("users_email_id_key"));
    }
}
