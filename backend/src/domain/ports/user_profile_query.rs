//! Driving port for the signed-in user's profile.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Profile lookup consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the profile for the authenticated user.
    async fn fetch_profile(&self, user_id: UserId) -> Result<User, Error>;
}
