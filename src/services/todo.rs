//! Todo use cases. Every operation is scoped to the owning user; another
//! user's todo looks exactly like a missing one.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::database::repository::TodoCursor;
use crate::database::{StorageError, TodoFilter, TodoModel, TodoRepository};

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("todo title and content should not be empty")]
    EmptyFields,
    #[error("todo id must not be nil")]
    NilId,
    #[error("no todo found")]
    NotFound,
    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for TodoError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::TodoNotFound => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

/// Fields supplied when creating a todo
#[derive(Debug, Clone, Default)]
pub struct NewTodo {
    pub title: String,
    pub content: String,
    pub finished: bool,
}

#[derive(Clone)]
pub struct TodoService {
    repo: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(repo: Arc<dyn TodoRepository>) -> Self {
        Self { repo }
    }

    pub async fn find_by_id(&self, owner: Uuid, id: Uuid) -> Result<TodoModel, TodoError> {
        if id.is_nil() {
            return Err(TodoError::NilId);
        }
        let todo = self.repo.find_one(id).await?;
        if todo.user_id != owner {
            return Err(TodoError::NotFound);
        }
        Ok(todo)
    }

    /// Cursor over the owner's todos, newest first.
    pub async fn list(&self, owner: Uuid, filter: TodoFilter) -> Result<TodoCursor, TodoError> {
        Ok(self.repo.find_all_of_user(owner, filter).await?)
    }

    pub async fn store_new(&self, owner: Uuid, todo: NewTodo) -> Result<TodoModel, TodoError> {
        check_fields(&todo.title, &todo.content)?;
        let todo = TodoModel {
            id: Uuid::new_v4(),
            user_id: owner,
            title: todo.title,
            content: todo.content,
            finished: todo.finished,
        };
        self.repo.insert_one(&todo).await?;
        Ok(todo)
    }

    /// Replace title, content and finished flag. Ownership cannot change.
    pub async fn update_one(&self, owner: Uuid, todo: TodoModel) -> Result<TodoModel, TodoError> {
        if todo.id.is_nil() {
            return Err(TodoError::NilId);
        }
        check_fields(&todo.title, &todo.content)?;
        self.find_by_id(owner, todo.id).await?;

        let todo = TodoModel { user_id: owner, ..todo };
        self.repo.update_one(&todo).await?;
        Ok(todo)
    }

    pub async fn delete_one(&self, owner: Uuid, id: Uuid) -> Result<(), TodoError> {
        self.find_by_id(owner, id).await?;
        self.repo.delete_one(id).await?;
        Ok(())
    }
}

fn check_fields(title: &str, content: &str) -> Result<(), TodoError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(TodoError::EmptyFields);
    }
    Ok(())
}
