//! In-memory repositories for tests. Mirrors the unique email constraint and
//! the newest-first todo listing of the SQL implementation.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::error::StorageError;
use crate::database::models::{TodoFilter, TodoModel, UserModel};
use crate::database::repository::{
    Cursor, HealthCheck, TODO_PAGE_SIZE, TodoCursor, TodoRepository, UserCursor, UserRepository,
};

#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<Vec<UserModel>>>,
    // insertion order; listing reverses it
    todos: Arc<RwLock<Vec<TodoModel>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every health check fail, as if the database went away.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn users(&self) -> Vec<UserModel> {
        self.users.read().await.clone()
    }
}

pub struct VecCursor<T> {
    items: VecDeque<T>,
    closed: bool,
}

impl<T> VecCursor<T> {
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().collect(),
            closed: false,
        }
    }
}

#[async_trait]
impl<T: Send> Cursor<T> for VecCursor<T> {
    async fn next(&mut self) -> Result<Option<T>, StorageError> {
        if self.closed {
            return Ok(None);
        }
        Ok(self.items.pop_front())
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        self.closed = true;
        self.items.clear();
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find(&self, id: Uuid) -> Result<UserModel, StorageError> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StorageError::UserNotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<UserModel, StorageError> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StorageError::UserNotFound)
    }

    async fn find_all(&self) -> Result<UserCursor, StorageError> {
        Ok(Box::new(VecCursor::new(self.users.read().await.clone())))
    }

    async fn update(&self, user: &UserModel) -> Result<(), StorageError> {
        let mut users = self.users.write().await;
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(StorageError::UserNotFound)?;
        *slot = user.clone();
        Ok(())
    }

    async fn store(&self, user: &UserModel) -> Result<Uuid, StorageError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StorageError::Duplicate("users_email_id_key".to_string()));
        }
        users.push(user.clone());
        Ok(user.id)
    }
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn find_one(&self, id: Uuid) -> Result<TodoModel, StorageError> {
        self.todos
            .read()
            .await
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StorageError::TodoNotFound)
    }

    async fn find_all_of_user(
        &self,
        user_id: Uuid,
        filter: TodoFilter,
    ) -> Result<TodoCursor, StorageError> {
        let todos = self.todos.read().await;
        let items: Vec<TodoModel> = todos
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .take(TODO_PAGE_SIZE)
            .cloned()
            .collect();
        Ok(Box::new(VecCursor::new(items)))
    }

    async fn insert_one(&self, todo: &TodoModel) -> Result<Uuid, StorageError> {
        self.todos.write().await.push(todo.clone());
        Ok(todo.id)
    }

    async fn update_one(&self, todo: &TodoModel) -> Result<(), StorageError> {
        let mut todos = self.todos.write().await;
        let slot = todos
            .iter_mut()
            .find(|t| t.id == todo.id)
            .ok_or(StorageError::TodoNotFound)?;
        slot.title = todo.title.clone();
        slot.content = todo.content.clone();
        slot.finished = todo.finished;
        Ok(())
    }

    async fn delete_one(&self, id: Uuid) -> Result<(), StorageError> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| t.id != id);
        if todos.len() == before {
            return Err(StorageError::TodoNotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn health_check(&self) -> Result<(), StorageError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Pool(deadpool_postgres::PoolError::Closed));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cursor_is_exhausted_after_close() {
        let mut cursor = VecCursor::new(vec![1, 2, 3]);
        assert_eq!(cursor.next().await.unwrap(), Some(1));
        cursor.close().await.unwrap();
        assert_eq!(cursor.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_collect_all_drains_in_order() {
        let mut cursor = VecCursor::new(vec!["a", "b"]);
        assert_eq!(cursor.collect_all().await.unwrap(), vec!["a", "b"]);
        assert_eq!(cursor.next().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let user = UserModel {
            id: Uuid::new_v4(),
            email: "ankur@example.com".to_string(),
            ..Default::default()
        };
        store.store(&user).await.unwrap();
        let again = UserModel { id: Uuid::new_v4(), ..user };
        assert!(matches!(store.store(&again).await, Err(StorageError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_find_all_users_drains_every_user() {
        let store = MemoryStore::new();
        for email in ["a@example.com", "b@example.com"] {
            let user = UserModel {
                id: Uuid::new_v4(),
                email: email.to_string(),
                ..Default::default()
            };
            store.store(&user).await.unwrap();
        }

        let mut cursor = store.find_all().await.unwrap();
        let emails: Vec<String> = cursor
            .collect_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
        assert!(cursor.next().await.unwrap().is_none());
    }
}
