//! PostgreSQL-backed `DriverRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{DriverRepository, DriverRepositoryError};
use crate::domain::{DriverRecord, LicenseId, NewDriver, RegisteredDriver, UserId, Username};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{DriverRow, NewDriverRow};
use super::pool::{DbPool, PoolError};
use super::schema::{drivers, users};

/// Diesel-backed implementation of the [`DriverRepository`] port.
#[derive(Clone)]
pub struct DieselDriverRepository {
    pool: DbPool,
}

impl DieselDriverRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DriverRepositoryError {
    map_basic_pool_error(error, DriverRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DriverRepositoryError {
    map_basic_diesel_error(
        error,
        DriverRepositoryError::query,
        DriverRepositoryError::connection,
    )
}

fn row_to_record(row: DriverRow) -> Result<DriverRecord, DriverRepositoryError> {
    let license_id = LicenseId::new(&row.license_id).map_err(|err| {
        DriverRepositoryError::query(format!("stored driver {} has invalid licence id: {err}", row.id))
    })?;
    let registered_by = UserId::new(row.registered_by).map_err(|err| {
        DriverRepositoryError::query(format!("stored driver {} has invalid registrant: {err}", row.id))
    })?;
    Ok(DriverRecord {
        id: row.id,
        license_id,
        full_name: row.full_name,
        date_of_birth: row.date_of_birth,
        license_type: row.license_type,
        expiry_date: row.expiry_date,
        qr_raw_data: row.qr_raw_data,
        ocr_raw_text: row.ocr_raw_text,
        created_at: row.created_at,
        registered_by,
        stored_status: row.status,
    })
}

fn joined_to_registered(
    (row, username): (DriverRow, Option<String>),
) -> Result<RegisteredDriver, DriverRepositoryError> {
    let registrant = username.and_then(|name| match Username::new(&name) {
        Ok(username) => Some(username),
        Err(error) => {
            warn!(%error, driver_id = row.id, "ignoring malformed registrant username");
            None
        }
    });
    Ok(RegisteredDriver {
        record: row_to_record(row)?,
        registrant,
    })
}

#[async_trait]
impl DriverRepository for DieselDriverRepository {
    async fn find_by_license_id(
        &self,
        license_id: &str,
    ) -> Result<Option<RegisteredDriver>, DriverRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let joined: Option<(DriverRow, Option<String>)> = drivers::table
            .left_join(users::table)
            .filter(drivers::license_id.eq(license_id))
            .select((DriverRow::as_select(), users::username.nullable()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        joined.map(joined_to_registered).transpose()
    }

    async fn insert(&self, driver: &NewDriver) -> Result<DriverRecord, DriverRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewDriverRow {
            license_id: driver.license_id.as_ref(),
            full_name: &driver.full_name,
            date_of_birth: driver.date_of_birth,
            license_type: &driver.license_type,
            expiry_date: driver.expiry_date,
            qr_raw_data: driver.qr_raw_data.as_deref(),
            ocr_raw_text: driver.ocr_raw_text.as_deref(),
            created_at: driver.created_at,
            registered_by: driver.registered_by.get(),
            status: driver.status.as_str(),
        };

        let inserted: DriverRow = diesel::insert_into(drivers::table)
            .values(&row)
            .returning(DriverRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    DriverRepositoryError::duplicate(driver.license_id.as_ref())
                } else {
                    map_diesel_error(err)
                }
            })?;

        row_to_record(inserted)
    }

    async fn list_all(&self) -> Result<Vec<RegisteredDriver>, DriverRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(DriverRow, Option<String>)> = drivers::table
            .left_join(users::table)
            .select((DriverRow::as_select(), users::username.nullable()))
            .order((drivers::created_at.desc(), drivers::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(joined_to_registered).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn row() -> DriverRow {
        DriverRow {
            id: 3,
            license_id: "DL-100".to_owned(),
            full_name: "Abebe Kebede".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 17).expect("date"),
            license_type: "B".to_owned(),
            expiry_date: NaiveDate::from_ymd_opt(2030, 1, 1).expect("date"),
            qr_raw_data: None,
            ocr_raw_text: Some("raw".to_owned()),
            created_at: Utc
                .with_ymd_and_hms(2024, 6, 1, 8, 0, 0)
                .single()
                .expect("timestamp"),
            registered_by: 1,
            status: "suspended".to_owned(),
        }
    }

    #[rstest]
    fn row_keeps_stored_status_verbatim(row: DriverRow) {
        let record = row_to_record(row).expect("valid row");
        assert_eq!(record.stored_status, "suspended");
        assert_eq!(record.license_id.as_ref(), "DL-100");
    }

    #[rstest]
    fn row_with_non_positive_registrant_is_a_query_error(mut row: DriverRow) {
        row.registered_by = 0;
        let error = row_to_record(row).expect_err("invalid registrant");
        assert!(matches!(error, DriverRepositoryError::Query { .. }));
    }

    #[rstest]
    fn malformed_username_is_treated_as_missing(row: DriverRow) {
        let registered =
            joined_to_registered((row, Some("bad name!".to_owned()))).expect("valid row");
        assert!(registered.registrant.is_none());
    }
}
