//! PostgreSQL-backed `VerificationLogRepository` implementation.
//!
//! Entries are only ever inserted. Queries left-join `users` on `checked_by`
//! because anonymous checks store `0`, which matches no user row.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{VerificationLogRepository, VerificationLogRepositoryError};
use crate::domain::{
    Checker, NewVerificationLogEntry, Username, VerificationLogEntry, VerificationLogFilter,
    VerificationLogRecord, VerificationOutcome,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewVerificationLogRow, VerificationLogRow};
use super::pool::{DbPool, PoolError};
use super::schema::{users, verification_logs};

/// Diesel-backed implementation of the [`VerificationLogRepository`] port.
#[derive(Clone)]
pub struct DieselVerificationLogRepository {
    pool: DbPool,
}

impl DieselVerificationLogRepository {
    /// Create an audit log repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VerificationLogRepositoryError {
    map_basic_pool_error(error, VerificationLogRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> VerificationLogRepositoryError {
    map_basic_diesel_error(
        error,
        VerificationLogRepositoryError::query,
        VerificationLogRepositoryError::connection,
    )
}

fn row_to_entry(row: VerificationLogRow) -> Result<VerificationLogEntry, VerificationLogRepositoryError> {
    let outcome = VerificationOutcome::from_stored(&row.verification_status).ok_or_else(|| {
        VerificationLogRepositoryError::query(format!(
            "verification log {} has unknown status '{}'",
            row.id, row.verification_status
        ))
    })?;
    Ok(VerificationLogEntry {
        id: row.id,
        license_id: row.license_id,
        outcome,
        checker: Checker::from_i32(row.checked_by),
        checked_at: row.checked_at,
    })
}

fn joined_to_record(
    (row, username): (VerificationLogRow, Option<String>),
) -> Result<VerificationLogRecord, VerificationLogRepositoryError> {
    let checker_username = username.and_then(|name| {
        Username::new(&name)
            .inspect_err(|error| warn!(%error, log_id = row.id, "ignoring malformed checker username"))
            .ok()
    });
    Ok(VerificationLogRecord {
        entry: row_to_entry(row)?,
        checker_username,
    })
}

#[async_trait]
impl VerificationLogRepository for DieselVerificationLogRepository {
    async fn append(
        &self,
        entry: &NewVerificationLogEntry,
    ) -> Result<VerificationLogEntry, VerificationLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewVerificationLogRow {
            license_id: &entry.license_id,
            verification_status: entry.outcome.as_str(),
            checked_by: entry.checker.as_i32(),
            checked_at: entry.checked_at,
        };

        let inserted: VerificationLogRow = diesel::insert_into(verification_logs::table)
            .values(&row)
            .returning(VerificationLogRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_entry(inserted)
    }

    async fn query(
        &self,
        filter: &VerificationLogFilter,
    ) -> Result<Vec<VerificationLogRecord>, VerificationLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = verification_logs::table
            .left_join(users::table.on(users::id.eq(verification_logs::checked_by)))
            .select((VerificationLogRow::as_select(), users::username.nullable()))
            .order((
                verification_logs::checked_at.desc(),
                verification_logs::id.desc(),
            ))
            .into_boxed();

        if let Some((from, until)) = filter.window() {
            query = query
                .filter(verification_logs::checked_at.ge(from))
                .filter(verification_logs::checked_at.lt(until));
        }
        if let Some(checker) = filter.checker {
            query = query.filter(verification_logs::checked_by.eq(checker.as_i32()));
        }
        if let Some(license_id) = filter.license_id.clone() {
            query = query.filter(verification_logs::license_id.eq(license_id));
        }

        let rows = query
            .load::<(VerificationLogRow, Option<String>)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(joined_to_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn row(status: &str, checked_by: i32) -> VerificationLogRow {
        VerificationLogRow {
            id: 9,
            license_id: "DL-100".to_owned(),
            verification_status: status.to_owned(),
            checked_by,
            checked_at: Utc
                .with_ymd_and_hms(2025, 1, 1, 8, 0, 0)
                .single()
                .expect("timestamp"),
        }
    }

    #[rstest]
    #[case("fake", VerificationOutcome::Fake)]
    #[case("Active", VerificationOutcome::Active)]
    #[case("expired", VerificationOutcome::Expired)]
    fn stored_status_parses(#[case] stored: &str, #[case] expected: VerificationOutcome) {
        let entry = row_to_entry(row(stored, 4)).expect("valid row");
        assert_eq!(entry.outcome, expected);
    }

    #[rstest]
    fn zero_checker_is_anonymous() {
        let entry = row_to_entry(row("fake", 0)).expect("valid row");
        assert_eq!(entry.checker, Checker::Anonymous);
    }

    #[rstest]
    fn unknown_status_is_a_query_error() {
        let error = row_to_entry(row("revoked", 4)).expect_err("unknown status");
        assert!(matches!(error, VerificationLogRepositoryError::Query { .. }));
    }
}
