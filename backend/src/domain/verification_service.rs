//! Verification engine.
//!
//! Looks up the licence, derives its status, appends exactly one audit entry
//! and shapes the result. Store failures are errors and are never reported
//! as a `Fake` outcome.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    DriverRepository, DriverRepositoryError, LicenseVerification, VerificationLogQuery,
    VerificationLogRepository, VerificationLogRepositoryError,
};
use crate::domain::{
    Checker, Error, NewVerificationLogEntry, VerificationLogExport, VerificationLogFilter, VerificationLogView,
    VerificationOutcome, VerificationRequest, VerificationResult, qr_payload_matches,
};

pub(crate) fn map_driver_repository_error(error: DriverRepositoryError) -> Error {
    match error {
        DriverRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("driver repository unavailable: {message}"))
        }
        DriverRepositoryError::Query { message } => {
            Error::internal(format!("driver repository error: {message}"))
        }
        DriverRepositoryError::Duplicate { license_id } => Error::conflict(format!(
            "License ID {license_id} is already registered in the system"
        ))
        .with_details(json!({ "licenseId": license_id })),
    }
}

fn map_log_repository_error(error: VerificationLogRepositoryError) -> Error {
    match error {
        VerificationLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("verification log unavailable: {message}"))
        }
        VerificationLogRepositoryError::Query { message } => {
            Error::internal(format!("verification log error: {message}"))
        }
    }
}

/// Verification engine implementing [`LicenseVerification`] and
/// [`VerificationLogQuery`].
#[derive(Clone)]
pub struct VerificationService<D, L> {
    drivers: Arc<D>,
    logs: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<D, L> VerificationService<D, L> {
    /// Create a service over the driver store, the audit log and a clock.
    pub fn new(drivers: Arc<D>, logs: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            drivers,
            logs,
            clock,
        }
    }
}

#[async_trait]
impl<D, L> LicenseVerification for VerificationService<D, L>
where
    D: DriverRepository,
    L: VerificationLogRepository,
{
    async fn verify(
        &self,
        request: VerificationRequest,
        checker: Checker,
    ) -> Result<VerificationResult, Error> {
        let VerificationRequest {
            license_id,
            scanned_qr_data,
        } = request;

        let now = self.clock.utc();
        let driver = self
            .drivers
            .find_by_license_id(&license_id)
            .await
            .map_err(map_driver_repository_error)?;

        let result = match driver {
            None => VerificationResult::fake(license_id.as_str(), now),
            Some(found) => {
                let record = found.record;
                if scanned_qr_data.is_some() {
                    debug!(
                        license_id = %license_id,
                        qr_match = qr_payload_matches(
                            scanned_qr_data.as_deref(),
                            record.qr_raw_data.as_deref()
                        ),
                        "scanned QR payload compared with registration"
                    );
                }
                VerificationResult::registered(
                    license_id.as_str(),
                    record.status_at(now),
                    record.full_name,
                    record.expiry_date,
                    now,
                )
            }
        };

        let entry = NewVerificationLogEntry {
            license_id,
            outcome: result.status,
            checker,
            checked_at: now,
        };
        let logged = self
            .logs
            .append(&entry)
            .await
            .map_err(map_log_repository_error)?;

        info!(
            log_id = logged.id,
            license_id = %logged.license_id,
            outcome = %logged.outcome,
            checked_by = logged.checker.as_i32(),
            "licence verification recorded"
        );
        Ok(result)
    }

    async fn check_status(&self, license_id: &str) -> Result<VerificationResult, Error> {
        let request = VerificationRequest {
            license_id: license_id.to_owned(),
            scanned_qr_data: None,
        };
        let result = self.verify(request, Checker::Anonymous).await?;
        if result.status == VerificationOutcome::Fake {
            return Err(Error::not_found(format!(
                "No license found with ID: {license_id}"
            )));
        }
        Ok(result)
    }
}

#[async_trait]
impl<D, L> VerificationLogQuery for VerificationService<D, L>
where
    D: DriverRepository,
    L: VerificationLogRepository,
{
    async fn list_logs(
        &self,
        filter: VerificationLogFilter,
    ) -> Result<Vec<VerificationLogView>, Error> {
        let records = self
            .logs
            .query(&filter)
            .await
            .map_err(map_log_repository_error)?;
        Ok(records.into_iter().map(VerificationLogView::from).collect())
    }

    async fn export_logs(
        &self,
        filter: VerificationLogFilter,
    ) -> Result<VerificationLogExport, Error> {
        let generated_on = self.clock.utc().date_naive();
        let logs = self.list_logs(filter).await?;
        Ok(VerificationLogExport { generated_on, logs })
    }
}

#[cfg(test)]
#[path = "verification_service_tests.rs"]
mod tests;
