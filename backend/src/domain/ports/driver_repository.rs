//! Driven port for driver record persistence.

use async_trait::async_trait;

use crate::domain::{DriverRecord, NewDriver, RegisteredDriver};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by driver repository adapters.
    pub enum DriverRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "driver repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "driver repository query failed: {message}",
        /// The licence id is already registered.
        Duplicate { license_id: String } => "license id {license_id} is already registered",
    }
}

/// Store of registered drivers keyed by licence id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriverRepository: Send + Sync {
    /// Exact, case-sensitive lookup by licence id.
    async fn find_by_license_id(
        &self,
        license_id: &str,
    ) -> Result<Option<RegisteredDriver>, DriverRepositoryError>;

    /// Insert a new record. Fails with [`DriverRepositoryError::Duplicate`]
    /// when the licence id already exists.
    async fn insert(&self, driver: &NewDriver) -> Result<DriverRecord, DriverRepositoryError>;

    /// Every record, newest first.
    async fn list_all(&self) -> Result<Vec<RegisteredDriver>, DriverRepositoryError>;
}
