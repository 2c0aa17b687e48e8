//! Signup and login business rules.
//!
//! Composes the [`Validator`], the [`CredentialHasher`] and a [`UserRepository`].
//! Negative outcomes (duplicate email, wrong password) are returned as values;
//! only storage and hashing failures are errors.

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::hasher::{CredentialHasher, HashError};
use crate::auth::validator::{Validator, normalize};
use crate::database::{StorageError, UserModel, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Name fields a user may change on their own profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    validator: Validator,
    hasher: CredentialHasher,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, validator: Validator) -> Self {
        Self {
            repo,
            validator,
            hasher: CredentialHasher::new(),
        }
    }

    pub fn is_valid_email(&self, email: &str) -> bool {
        self.validator.is_valid_email(email)
    }

    pub fn is_valid_password(&self, password: &str) -> bool {
        self.validator.is_valid_password(password)
    }

    /// True iff a user with exactly the normalized email already exists.
    pub async fn is_duplicate_registration(&self, email: &str) -> Result<bool, AuthError> {
        let email = normalize(email);
        match self.repo.find_by_email(&email).await {
            Ok(user) => Ok(user.email == email),
            Err(StorageError::UserNotFound) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the user when email and password match a stored account.
    ///
    /// Unknown email, email mismatch, an out-of-shape password, and a wrong
    /// password all yield `Ok(None)`. A lookup miss returns before any hash
    /// comparison runs, so it answers faster than a wrong password.
    pub async fn is_credential_valid(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserModel>, AuthError> {
        let email = normalize(email);
        let user = match self.repo.find_by_email(&email).await {
            Ok(user) => user,
            Err(StorageError::UserNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if user.email != email || !self.validator.is_valid_password(password) {
            return Ok(None);
        }

        let matched = self
            .hasher
            .verify_blocking(password.to_string(), user.password.clone())
            .await?;
        Ok(matched.then_some(user))
    }

    /// Hash the password, assign a fresh id and persist the user.
    ///
    /// `model.password` is the plaintext; it never reaches the repository.
    pub async fn store_user(&self, model: UserModel) -> Result<Uuid, AuthError> {
        let password_hash = self.hasher.hash_blocking(model.password).await?;
        let user = UserModel {
            id: Uuid::new_v4(),
            email: normalize(&model.email),
            password: password_hash,
            first_name: model.first_name,
            last_name: model.last_name,
            username: model.username,
        };
        Ok(self.repo.store(&user).await?)
    }

    pub async fn find_user(&self, id: Uuid) -> Result<UserModel, AuthError> {
        Ok(self.repo.find(id).await?)
    }

    /// Apply the provided name fields. Email and password hash are left as stored.
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<UserModel, AuthError> {
        let mut user = self.repo.find(id).await?;
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(username) = update.username {
            user.username = username;
        }
        self.repo.update(&user).await?;
        Ok(user)
    }
}
