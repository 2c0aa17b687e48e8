//! # Services Module
//!
//! Business logic for tenant-owned data.

pub mod todo;

pub use todo::{NewTodo, TodoError, TodoService};
