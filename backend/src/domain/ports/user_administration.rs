//! Driving port for staff account provisioning.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Account administration use-case used by operator tooling.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAdministration: Send + Sync {
    /// Create an active staff account with a freshly hashed password.
    async fn create_user(&self, username: &str, password: &str) -> Result<User, Error>;
}
