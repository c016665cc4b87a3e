//! Driver registration and read-side queries.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{DriverCommand, DriverQuery, DriverRepository};
use crate::domain::verification_service::map_driver_repository_error;
use crate::domain::{
    DriverStatistics, DriverView, Error, RegisteredDriver, RegistrationDraft, UserId,
    validate_registration,
};

/// Registration and query service over a [`DriverRepository`].
#[derive(Clone)]
pub struct DriverService<D> {
    drivers: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<D> DriverService<D> {
    /// Create a service over the driver store and a clock.
    pub fn new(drivers: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self { drivers, clock }
    }
}

fn already_registered(existing: &RegisteredDriver, status: &str) -> Error {
    let license_id = existing.record.license_id.as_ref();
    Error::conflict(format!(
        "License ID {license_id} is already registered in the system"
    ))
    .with_details(json!({ "licenseId": license_id, "status": status }))
}

#[async_trait]
impl<D> DriverCommand for DriverService<D>
where
    D: DriverRepository,
{
    async fn register(
        &self,
        draft: RegistrationDraft,
        registrant: UserId,
    ) -> Result<DriverView, Error> {
        let now = self.clock.utc();
        let new_driver = validate_registration(draft, registrant, now)?;

        let existing = self
            .drivers
            .find_by_license_id(new_driver.license_id.as_ref())
            .await
            .map_err(map_driver_repository_error)?;
        if let Some(existing) = existing {
            let status = existing.record.status_at(now);
            return Err(already_registered(&existing, status.as_str()));
        }

        let record = self
            .drivers
            .insert(&new_driver)
            .await
            .map_err(map_driver_repository_error)?;

        info!(
            driver_id = record.id,
            license_id = %record.license_id,
            registered_by = registrant.get(),
            "driver registered"
        );

        let reread = self
            .drivers
            .find_by_license_id(record.license_id.as_ref())
            .await;
        let registered = match reread {
            Ok(Some(registered)) => registered,
            Ok(None) => RegisteredDriver {
                record,
                registrant: None,
            },
            Err(error) => {
                warn!(
                    license_id = %record.license_id,
                    error = %error,
                    "registrant lookup failed after insert"
                );
                RegisteredDriver {
                    record,
                    registrant: None,
                }
            }
        };
        Ok(DriverView::project(registered, now))
    }
}

#[async_trait]
impl<D> DriverQuery for DriverService<D>
where
    D: DriverRepository,
{
    async fn list_drivers(&self) -> Result<Vec<DriverView>, Error> {
        let now = self.clock.utc();
        let drivers = self
            .drivers
            .list_all()
            .await
            .map_err(map_driver_repository_error)?;
        Ok(drivers
            .into_iter()
            .map(|driver| DriverView::project(driver, now))
            .collect())
    }

    async fn get_driver(&self, license_id: &str) -> Result<DriverView, Error> {
        let now = self.clock.utc();
        self.drivers
            .find_by_license_id(license_id)
            .await
            .map_err(map_driver_repository_error)?
            .map(|driver| DriverView::project(driver, now))
            .ok_or_else(|| {
                Error::not_found(format!("No driver found with license ID: {license_id}"))
                    .with_details(json!({ "licenseId": license_id }))
            })
    }

    async fn statistics(&self) -> Result<DriverStatistics, Error> {
        let now = self.clock.utc();
        let drivers = self
            .drivers
            .list_all()
            .await
            .map_err(map_driver_repository_error)?;
        Ok(DriverStatistics::tally(
            drivers.iter().map(|driver| &driver.record),
            now,
        ))
    }
}

#[cfg(test)]
#[path = "driver_service_tests.rs"]
mod tests;
