//! PostgreSQL-backed [`TodoRepository`].

use async_trait::async_trait;
use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::database::cursor::PgCursor;
use crate::database::error::StorageError;
use crate::database::models::{FromRow, TodoFilter, TodoModel};
use crate::database::repository::{TodoCursor, TodoRepository};

const FIND_TODO_BY_ID: &str =
    "SELECT todo_id, user_id, title, content, finished FROM todos WHERE todo_id = $1";
// $2 is NULL for no filter, otherwise the wanted `finished` value
const FIND_TODOS_OF_USER: &str = "SELECT todo_id, user_id, title, content, finished FROM todos \
     WHERE user_id = $1 AND ($2::BOOLEAN IS NULL OR finished = $2) \
     ORDER BY created_at DESC LIMIT 50";
const INSERT_TODO: &str =
    "INSERT INTO todos (todo_id, user_id, title, content, finished) VALUES ($1, $2, $3, $4, $5)";
const UPDATE_TODO: &str =
    "UPDATE todos SET title = $2, content = $3, finished = $4 WHERE todo_id = $1";
const DELETE_TODO: &str = "DELETE FROM todos WHERE todo_id = $1";

#[derive(Clone)]
pub struct PgTodoRepository {
    pool: Pool,
}

impl PgTodoRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn finished_param(filter: TodoFilter) -> Option<bool> {
    match filter {
        TodoFilter::All => None,
        TodoFilter::Finished => Some(true),
        TodoFilter::Unfinished => Some(false),
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn find_one(&self, id: Uuid) -> Result<TodoModel, StorageError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(FIND_TODO_BY_ID, &[&id])
            .await
            .map_err(|e| StorageError::query(FIND_TODO_BY_ID, e))?
            .ok_or(StorageError::TodoNotFound)?;
        TodoModel::from_row(&row).map_err(|e| StorageError::query(FIND_TODO_BY_ID, e))
    }

    async fn find_all_of_user(
        &self,
        user_id: Uuid,
        filter: TodoFilter,
    ) -> Result<TodoCursor, StorageError> {
        let finished = finished_param(filter);
        let cursor =
            PgCursor::<TodoModel>::open(&self.pool, FIND_TODOS_OF_USER, &[&user_id, &finished])
                .await?;
        Ok(Box::new(cursor))
    }

    async fn insert_one(&self, todo: &TodoModel) -> Result<Uuid, StorageError> {
        let client = self.pool.get().await?;
        let rows = client
            .execute(
                INSERT_TODO,
                &[&todo.id, &todo.user_id, &todo.title, &todo.content, &todo.finished],
            )
            .await
            .map_err(|e| StorageError::query(INSERT_TODO, e))?;
        if rows != 1 {
            return Err(StorageError::RowsAffected { command: "insert todo", rows });
        }
        Ok(todo.id)
    }

    async fn update_one(&self, todo: &TodoModel) -> Result<(), StorageError> {
        let client = self.pool.get().await?;
        let rows = client
            .execute(UPDATE_TODO, &[&todo.id, &todo.title, &todo.content, &todo.finished])
            .await
            .map_err(|e| StorageError::query(UPDATE_TODO, e))?;
        match rows {
            0 => Err(StorageError::TodoNotFound),
            _ => Ok(()),
        }
    }

    async fn delete_one(&self, id: Uuid) -> Result<(), StorageError> {
        let client = self.pool.get().await?;
        let rows = client
            .execute(DELETE_TODO, &[&id])
            .await
            .map_err(|e| StorageError::query(DELETE_TODO, e))?;
        match rows {
            0 => Err(StorageError::TodoNotFound),
            _ => Ok(()),
        }
    }
}
