//! Storage contracts consumed by the services.
//!
//! Services only see these traits; `PgUserRepository` / `PgTodoRepository`
//! back them in production.

use async_trait::async_trait;
use uuid::Uuid;

use crate::database::error::StorageError;
use crate::database::models::{TodoFilter, TodoModel, UserModel};

/// Pull-based cursor over a finite query result.
///
/// Rows are fetched on demand. After `close`, or once `next` has returned
/// `Ok(None)`, the cursor stays exhausted. Ask the repository again to restart.
#[async_trait]
pub trait Cursor<T: Send>: Send {
    async fn next(&mut self) -> Result<Option<T>, StorageError>;

    /// Release the underlying result set and connection.
    async fn close(&mut self) -> Result<(), StorageError>;

    /// Drain the remaining rows and close.
    async fn collect_all(&mut self) -> Result<Vec<T>, StorageError> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        self.close().await?;
        Ok(items)
    }
}

pub type UserCursor = Box<dyn Cursor<UserModel>>;
pub type TodoCursor = Box<dyn Cursor<TodoModel>>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find(&self, id: Uuid) -> Result<UserModel, StorageError>;
    /// Fails with [`StorageError::UserNotFound`] when no row matches.
    async fn find_by_email(&self, email: &str) -> Result<UserModel, StorageError>;
    async fn find_all(&self) -> Result<UserCursor, StorageError>;
    async fn update(&self, user: &UserModel) -> Result<(), StorageError>;
    async fn store(&self, user: &UserModel) -> Result<Uuid, StorageError>;
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn find_one(&self, id: Uuid) -> Result<TodoModel, StorageError>;
    /// Newest first, bounded to [`TODO_PAGE_SIZE`] rows.
    async fn find_all_of_user(
        &self,
        user_id: Uuid,
        filter: TodoFilter,
    ) -> Result<TodoCursor, StorageError>;
    async fn insert_one(&self, todo: &TodoModel) -> Result<Uuid, StorageError>;
    async fn update_one(&self, todo: &TodoModel) -> Result<(), StorageError>;
    async fn delete_one(&self, id: Uuid) -> Result<(), StorageError>;
}

/// Readiness probe for the backing store.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn health_check(&self) -> Result<(), StorageError>;
}

pub const TODO_PAGE_SIZE: usize = 50;
