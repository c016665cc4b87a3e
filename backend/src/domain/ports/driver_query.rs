//! Driving port for driver lookups and registry statistics.

use async_trait::async_trait;

use crate::domain::{DriverStatistics, DriverView, Error};

/// Read-side driver use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DriverQuery: Send + Sync {
    /// All drivers, newest registration first.
    async fn list_drivers(&self) -> Result<Vec<DriverView>, Error>;

    /// One driver by licence id, or `not_found`.
    async fn get_driver(&self, license_id: &str) -> Result<DriverView, Error>;

    /// Counts by derived status.
    async fn statistics(&self) -> Result<DriverStatistics, Error>;
}
