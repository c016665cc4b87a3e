//! Staff sign-in, profile lookup and account provisioning.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, UserAdministration, UserPersistenceError,
    UserProfileQuery, UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, NewUser, User, UserAccountStatus, UserId, UserValidationError,
    Username,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { username } => {
            Error::conflict(format!("username {username} is already taken"))
                .with_details(json!({ "username": username }))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn invalid_username(error: UserValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": "username" }))
}

/// User account service over a [`UserRepository`] and a [`PasswordHasher`].
#[derive(Clone)]
pub struct UserAccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> UserAccountService<U, H> {
    /// Create a service over the user store and a password hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl<U, H> LoginService for UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        // Usernames the store could never hold fail the same way as unknown ones.
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let record = self
            .users
            .find_credentials_by_username(&username)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_CREDENTIALS))?;

        let matches = self
            .hasher
            .verify(credentials.password(), &record.password_hash)
            .map_err(|err| {
                debug!(error = %err, "stored password hash rejected");
                map_hash_error(err)
            })?;
        if !matches {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if record.user.status() != UserAccountStatus::Active {
            warn!(user_id = %record.user.id(), "sign-in attempt for disabled account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        Ok(record.user.id())
    }
}

#[async_trait]
impl<U, H> UserProfileQuery for UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn fetch_profile(&self, user_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))
    }
}

#[async_trait]
impl<U, H> UserAdministration for UserAccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn create_user(&self, username: &str, password: &str) -> Result<User, Error> {
        let username = Username::new(username).map_err(invalid_username)?;
        if password.is_empty() {
            return Err(Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password" })));
        }
        let password_hash = self.hasher.hash(password).map_err(map_hash_error)?;
        let user = self
            .users
            .insert(&NewUser {
                username,
                password_hash,
                status: UserAccountStatus::Active,
            })
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), username = %user.username(), "staff user created");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
