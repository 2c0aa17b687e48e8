//! PostgreSQL-backed [`UserRepository`].

use async_trait::async_trait;
use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::database::cursor::PgCursor;
use crate::database::error::StorageError;
use crate::database::models::{FromRow, UserModel};
use crate::database::repository::{UserCursor, UserRepository};

const FIND_USER_BY_ID: &str = "SELECT user_id, email_id, password_hash, first_name, last_name, user_name FROM users WHERE user_id = $1";
const FIND_USER_BY_EMAIL: &str = "SELECT user_id, email_id, password_hash, first_name, last_name, user_name FROM users WHERE email_id = $1";
const FIND_ALL_USERS: &str = "SELECT user_id, email_id, password_hash, first_name, last_name, user_name FROM users ORDER BY created_at";
const UPDATE_USER: &str = "UPDATE users SET email_id = $2, password_hash = $3, first_name = $4, last_name = $5, user_name = $6 WHERE user_id = $1";
const STORE_USER: &str = "INSERT INTO users (user_id, email_id, password_hash, first_name, last_name, user_name) VALUES ($1, $2, $3, $4, $5, $6)";

#[derive(Clone)]
pub struct PgUserRepository {
    pool: Pool,
}

impl PgUserRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn find_one(
        &self,
        query: &'static str,
        param: &(dyn tokio_postgres::types::ToSql + Sync),
    ) -> Result<UserModel, StorageError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(query, &[param])
            .await
            .map_err(|e| StorageError::query(query, e))?
            .ok_or(StorageError::UserNotFound)?;
        UserModel::from_row(&row).map_err(|e| StorageError::query(query, e))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find(&self, id: Uuid) -> Result<UserModel, StorageError> {
        self.find_one(FIND_USER_BY_ID, &id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<UserModel, StorageError> {
        self.find_one(FIND_USER_BY_EMAIL, &email).await
    }

    async fn find_all(&self) -> Result<UserCursor, StorageError> {
        let cursor = PgCursor::<UserModel>::open(&self.pool, FIND_ALL_USERS, &[]).await?;
        Ok(Box::new(cursor))
    }

    async fn update(&self, user: &UserModel) -> Result<(), StorageError> {
        let client = self.pool.get().await?;
        let rows = client
            .execute(
                UPDATE_USER,
                &[
                    &user.id,
                    &user.email,
                    &user.password,
                    &user.first_name,
                    &user.last_name,
                    &user.username,
                ],
            )
            .await
            .map_err(|e| StorageError::query(UPDATE_USER, e))?;
        match rows {
            1 => Ok(()),
            0 => Err(StorageError::UserNotFound),
            rows => Err(StorageError::RowsAffected { command: "update user", rows }),
        }
    }

    async fn store(&self, user: &UserModel) -> Result<Uuid, StorageError> {
        let client = self.pool.get().await?;
        let rows = client
            .execute(
                STORE_USER,
                &[
                    &user.id,
                    &user.email,
                    &user.password,
                    &user.first_name,
                    &user.last_name,
                    &user.username,
                ],
            )
            .await
            .map_err(|e| StorageError::query(STORE_USER, e))?;
        if rows != 1 {
            return Err(StorageError::RowsAffected { command: "insert user", rows });
        }
        Ok(user.id)
    }
}
