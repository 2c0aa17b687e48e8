//! # Authentication Module
//!
//! Credential validation and hashing, signup/login rules, bearer token
//! issuance and validation, and the middleware securing tenant routes.

pub mod hasher;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod service;
pub mod validator;

pub use jwt::TokenIssuer;
pub use middleware::AuthMiddleware;
pub use models::AuthUser;
pub use service::{AuthError, AuthService, ProfileUpdate};
pub use validator::Validator;
