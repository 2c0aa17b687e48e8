//! Authentication Middleware
//!
//! Axum middleware for bearer token validation and user authentication.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{jwt::TokenIssuer, models::AuthUser};
use crate::error::ApiError;

/// Authentication middleware that validates bearer tokens and injects user info
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Middleware function for validating bearer tokens
    pub async fn validate_token(
        State(issuer): State<Arc<TokenIssuer>>,
        mut req: Request,
        next: Next,
    ) -> Result<Response, ApiError> {
        let Some(token) = bearer_token(&req) else {
            tracing::warn!(method = %req.method(), uri = %req.uri(), "missing bearer token");
            return Err(ApiError::Unauthorized);
        };

        let user_id = match issuer.validate_user_id(token) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(method = %req.method(), uri = %req.uri(), error = %e, "token rejected");
                return Err(ApiError::Unauthorized);
            }
        };
        tracing::debug!(%user_id, "token validated");

        // Insert the user into request extensions for downstream handlers
        req.extensions_mut().insert(AuthUser { id: user_id });

        Ok(next.run(req).await)
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(auth: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/v1/todos");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&request(Some("Bearer abc.def.ghi"))), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&request(Some("Basic dXNlcjpwYXNz"))), None);
        assert_eq!(bearer_token(&request(Some("Bearer   "))), None);
        assert_eq!(bearer_token(&request(None)), None);
    }
}
