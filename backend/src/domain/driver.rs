//! Registered driver records and their read projections.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{LicenseId, LicenseStatus, UserId, Username, effective_status};

/// Username shown when the registrant account no longer exists.
pub const UNKNOWN_USERNAME: &str = "Unknown";

/// Driver record as held by the registry store.
///
/// Records are never deleted. `stored_status` is the display value written at
/// registration time; read paths derive the real status via
/// [`DriverRecord::status_at`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverRecord {
    pub id: i32,
    pub license_id: LicenseId,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub license_type: String,
    pub expiry_date: NaiveDate,
    pub qr_raw_data: Option<String>,
    pub ocr_raw_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub registered_by: UserId,
    pub stored_status: String,
}

impl DriverRecord {
    /// Derived status at `now`.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> LicenseStatus {
        effective_status(&self.stored_status, self.expiry_date, now)
    }
}

/// Validated registration ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDriver {
    pub license_id: LicenseId,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub license_type: String,
    pub expiry_date: NaiveDate,
    pub qr_raw_data: Option<String>,
    pub ocr_raw_text: Option<String>,
    pub registered_by: UserId,
    pub status: LicenseStatus,
    pub created_at: DateTime<Utc>,
}

/// Driver record joined with the registrant's username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredDriver {
    pub record: DriverRecord,
    pub registrant: Option<Username>,
}

/// Driver representation returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverView {
    pub driver_id: i32,
    #[schema(value_type = String, example = "DL-100")]
    pub license_id: LicenseId,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub license_type: String,
    pub expiry_date: NaiveDate,
    pub status: LicenseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_raw_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_raw_text: Option<String>,
    pub created_date: DateTime<Utc>,
    pub registered_by: i32,
    pub registered_by_username: String,
}

impl DriverView {
    /// Project a stored driver using the status derived at `now`.
    #[must_use]
    pub fn project(driver: RegisteredDriver, now: DateTime<Utc>) -> Self {
        let status = driver.record.status_at(now);
        let RegisteredDriver { record, registrant } = driver;
        Self {
            driver_id: record.id,
            license_id: record.license_id,
            full_name: record.full_name,
            date_of_birth: record.date_of_birth,
            license_type: record.license_type,
            expiry_date: record.expiry_date,
            status,
            qr_raw_data: record.qr_raw_data,
            ocr_raw_text: record.ocr_raw_text,
            created_date: record.created_at,
            registered_by: record.registered_by.get(),
            registered_by_username: registrant
                .map_or_else(|| UNKNOWN_USERNAME.to_owned(), String::from),
        }
    }
}

/// Registry-wide counts by derived status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverStatistics {
    pub total_drivers: u64,
    pub active_drivers: u64,
    pub expired_drivers: u64,
}

impl DriverStatistics {
    /// Tally records using the same status rule as verification.
    #[must_use]
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a DriverRecord>, now: DateTime<Utc>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut stats, record| {
                stats.total_drivers += 1;
                match record.status_at(now) {
                    LicenseStatus::Active => stats.active_drivers += 1,
                    LicenseStatus::Expired => stats.expired_drivers += 1,
                }
                stats
            })
    }
}
