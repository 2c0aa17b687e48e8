//! Todo endpoints. All of them run behind the auth middleware and only ever
//! touch the caller's own todos.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::database::{Cursor, TodoFilter, TodoModel};
use crate::error::ApiError;
use crate::routes::{ApiJson, respond};
use crate::server::AppState;
use crate::services::NewTodo;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub finished: bool,
}

/// Fields left out keep their stored value.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub finished: Option<bool>,
}

fn todo_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::BadRequest("Invalid todo id.".to_string()))
}

pub async fn list_todos(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) =
        query.map_err(|_| ApiError::BadRequest("Invalid query string.".to_string()))?;
    let filter = match params.status.as_deref() {
        None => TodoFilter::All,
        Some(status) => status.parse::<TodoFilter>().map_err(ApiError::BadRequest)?,
    };

    let mut cursor = state.todos.list(user.id, filter).await?;
    let todos = cursor.collect_all().await?;
    tracing::debug!(user_id = %user.id, ?filter, count = todos.len(), "listed todos");

    Ok(respond(StatusCode::OK, todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(form): ApiJson<CreateTodoRequest>,
) -> Result<Response, ApiError> {
    let todo = state
        .todos
        .store_new(
            user.id,
            NewTodo {
                title: form.title,
                content: form.content,
                finished: form.finished,
            },
        )
        .await?;
    tracing::info!(user_id = %user.id, todo_id = %todo.id, "todo created");

    Ok(respond(StatusCode::CREATED, json!({ "id": todo.id })))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ApiError> {
    let todo = state.todos.find_by_id(user.id, todo_id(path)?).await?;
    Ok(respond(StatusCode::OK, todo))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
    ApiJson(form): ApiJson<UpdateTodoRequest>,
) -> Result<Response, ApiError> {
    let current = state.todos.find_by_id(user.id, todo_id(path)?).await?;
    let merged = TodoModel {
        title: form.title.unwrap_or(current.title),
        content: form.content.unwrap_or(current.content),
        finished: form.finished.unwrap_or(current.finished),
        ..current
    };

    let todo = state.todos.update_one(user.id, merged).await?;
    tracing::info!(user_id = %user.id, todo_id = %todo.id, "todo updated");

    Ok(respond(StatusCode::OK, todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = todo_id(path)?;
    state.todos.delete_one(user.id, id).await?;
    tracing::info!(user_id = %user.id, todo_id = %id, "todo deleted");

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Routes here expect the auth middleware to be layered on by the caller.
pub fn create_todo_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/todos", get(list_todos).post(create_todo))
        .route(
            "/v1/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

#[cfg(test)]
mod tests {
    use crate::server::testing::TestApp;
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};

    async fn create(app: &TestApp, token: &str, title: &str, finished: bool) -> String {
        let body = json!({ "title": title, "content": "something", "finished": finished }).to_string();
        let (status, json) = app.send(Method::POST, "/v1/todos", Some(token), Some(&body)).await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["id"].as_str().unwrap().to_string()
    }

    fn titles(json: &Value) -> Vec<&str> {
        json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|todo| todo["title"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_todos_require_token() {
        let app = TestApp::new();
        let (status, _) = app.send(Method::GET, "/v1/todos", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let body = json!({ "title": "a", "content": "b" }).to_string();
        let (status, _) = app.send(Method::POST, "/v1/todos", None, Some(&body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let app = TestApp::new();
        let token = app.login_new_user("ankur@example.com").await;
        let id = create(&app, &token, "groceries", false).await;
        let path = format!("/v1/todos/{id}");

        let (status, json) = app.send(Method::GET, &path, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["title"], "groceries");
        assert_eq!(json["data"]["finished"], false);

        let patch = json!({ "finished": true }).to_string();
        let (status, json) = app.send(Method::PUT, &path, Some(&token), Some(&patch)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["finished"], true);
        assert_eq!(json["data"]["title"], "groceries");

        let (status, _) = app.send(Method::DELETE, &path, Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, json) = app.send(Method::GET, &path, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["errors"][0]["message"], "Todo not found.");
    }

    #[tokio::test]
    async fn test_list_with_status_filter() {
        let app = TestApp::new();
        let token = app.login_new_user("ankur@example.com").await;
        create(&app, &token, "first", true).await;
        create(&app, &token, "second", false).await;

        let (status, json) = app.send(Method::GET, "/v1/todos", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(titles(&json), vec!["second", "first"]);

        let (_, json) = app
            .send(Method::GET, "/v1/todos?status=finished", Some(&token), None)
            .await;
        assert_eq!(titles(&json), vec!["first"]);

        let (_, json) = app
            .send(Method::GET, "/v1/todos?status=unfinished", Some(&token), None)
            .await;
        assert_eq!(titles(&json), vec!["second"]);

        let (status, _) = app
            .send(Method::GET, "/v1/todos?status=someday", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_query_uses_error_envelope() {
        let app = TestApp::new();
        let token = app.login_new_user("ankur@example.com").await;

        let (status, json) = app
            .send(Method::GET, "/v1/todos?status=a&status=b", Some(&token), None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0]["message"], "Invalid query string.");
    }

    #[tokio::test]
    async fn test_other_user_gets_not_found() {
        let app = TestApp::new();
        let owner = app.login_new_user("owner@example.com").await;
        let intruder = app.login_new_user("intruder@example.com").await;
        let id = create(&app, &owner, "private", false).await;
        let path = format!("/v1/todos/{id}");

        let (status, _) = app.send(Method::GET, &path, Some(&intruder), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let patch = json!({ "title": "hijacked" }).to_string();
        let (status, _) = app.send(Method::PUT, &path, Some(&intruder), Some(&patch)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.send(Method::DELETE, &path, Some(&intruder), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, json) = app.send(Method::GET, "/v1/todos", Some(&intruder), None).await;
        assert!(titles(&json).is_empty());

        let (status, json) = app.send(Method::GET, &path, Some(&owner), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["title"], "private");
    }

    #[tokio::test]
    async fn test_bad_input_is_bad_request() {
        let app = TestApp::new();
        let token = app.login_new_user("ankur@example.com").await;

        let empty = json!({ "title": "  ", "content": "x" }).to_string();
        let (status, _) = app.send(Method::POST, "/v1/todos", Some(&token), Some(&empty)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app.send(Method::GET, "/v1/todos/not-a-uuid", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let nil = format!("/v1/todos/{}", uuid::Uuid::nil());
        let (status, _) = app.send(Method::GET, &nil, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
