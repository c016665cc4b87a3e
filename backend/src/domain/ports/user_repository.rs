//! Driven port for staff user persistence.

use async_trait::async_trait;

use crate::domain::{NewUser, User, UserCredentialsRecord, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already taken.
        Duplicate { username: String } => "username {username} is already taken",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and stored password hash for sign-in.
    async fn find_credentials_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserCredentialsRecord>, UserPersistenceError>;

    /// Insert a new user.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;
}
