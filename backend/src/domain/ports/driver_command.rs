//! Driving port for driver registration.

use async_trait::async_trait;

use crate::domain::{DriverView, Error, RegistrationDraft, UserId};

/// Registration use-case consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriverCommand: Send + Sync {
    /// Validate and register a driver on behalf of `registrant`.
    async fn register(
        &self,
        draft: RegistrationDraft,
        registrant: UserId,
    ) -> Result<DriverView, Error>;
}
