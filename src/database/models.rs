// Database Models
//
// Tokio-postgres compatible models for the users and todos tables.

use serde::{Deserialize, Serialize};
use tokio_postgres::Row;
use uuid::Uuid;

/// Trait for converting from tokio-postgres Row
pub trait FromRow {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>
    where
        Self: Sized;
}

// ============================================================================
// USER MODELS
// ============================================================================

/// A registered user. `password` only ever holds the hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModel {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl FromRow for UserModel {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("user_id")?,
            email: row.try_get("email_id")?,
            password: row.try_get("password_hash")?,
            first_name: row.try_get::<_, Option<String>>("first_name")?.unwrap_or_default(),
            last_name: row.try_get::<_, Option<String>>("last_name")?.unwrap_or_default(),
            username: row.try_get::<_, Option<String>>("user_name")?.unwrap_or_default(),
        })
    }
}

// ============================================================================
// TODO MODELS
// ============================================================================

/// A single todo item owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub finished: bool,
}

impl FromRow for TodoModel {
    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("todo_id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            finished: row.try_get("finished")?,
        })
    }
}

/// Which todos a listing query returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    #[default]
    All,
    Finished,
    Unfinished,
}

impl std::str::FromStr for TodoFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "finished" => Ok(Self::Finished),
            "unfinished" => Ok(Self::Unfinished),
            other => Err(format!("unsupported filter: {other}")),
        }
    }
}

impl TodoFilter {
    /// Whether `todo` passes this filter.
    pub fn matches(self, todo: &TodoModel) -> bool {
        match self {
            Self::All => true,
            Self::Finished => todo.finished,
            Self::Unfinished => !todo.finished,
        }
    }
}
