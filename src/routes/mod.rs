// # Routes Module
//
// - This module contains all HTTP route handlers for the todo server.
// - Routes are organized by functionality into separate submodules.
//
//  ## Available Route Modules
// - `health`: Home and health check endpoints
// - `auth`: Signup and login
// - `users`: Profile of the authenticated user
// - `todos`: Tenant-scoped todo CRUD

use axum::Json;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use crate::error::ApiError;

/// Home and health check endpoints
pub mod health;

/// Signup and login endpoints
pub mod auth;

/// Authenticated user profile endpoints
pub mod users;

/// Todo endpoints
pub mod todos;

/// JSON body extractor whose rejections become `400 Invalid request.`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Wrap `data` in the success envelope.
pub fn respond<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}
