//! Storage errors shared by every repository implementation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// No user matches the id or email
    #[error("no user found")]
    UserNotFound,
    /// No todo matches the id
    #[error("no todo found")]
    TodoNotFound,
    /// A unique constraint rejected the write
    #[error("duplicate key: {0}")]
    Duplicate(String),
    /// A write statement touched an unexpected number of rows
    #[error("{command} affected {rows} rows")]
    RowsAffected { command: &'static str, rows: u64 },
    #[error("query `{query}` failed: {source}")]
    Query {
        query: &'static str,
        #[source]
        source: tokio_postgres::Error,
    },
    #[error("failed to get database connection: {0}")]
    Pool(#[from] deadpool_postgres::PoolError),
}

impl StorageError {
    /// Wrap a driver error, promoting unique violations to [`StorageError::Duplicate`].
    pub fn query(query: &'static str, source: tokio_postgres::Error) -> Self {
        if let Some(db) = source.as_db_error() {
            if db.code() == &tokio_postgres::error::SqlState::UNIQUE_VIOLATION {
                return Self::Duplicate(db.constraint().unwrap_or("unknown").to_string());
            }
        }
        Self::Query { query, source }
    }
}
