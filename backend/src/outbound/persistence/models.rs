//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use super::schema::{drivers, users, verification_logs};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub status: &'a str,
}

/// Row struct for reading from the drivers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = drivers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DriverRow {
    pub id: i32,
    pub license_id: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub license_type: String,
    pub expiry_date: NaiveDate,
    pub qr_raw_data: Option<String>,
    pub ocr_raw_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub registered_by: i32,
    pub status: String,
}

/// Insertable struct for registering drivers.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = drivers)]
pub(crate) struct NewDriverRow<'a> {
    pub license_id: &'a str,
    pub full_name: &'a str,
    pub date_of_birth: NaiveDate,
    pub license_type: &'a str,
    pub expiry_date: NaiveDate,
    pub qr_raw_data: Option<&'a str>,
    pub ocr_raw_text: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub registered_by: i32,
    pub status: &'a str,
}

/// Row struct for reading from the verification_logs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = verification_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VerificationLogRow {
    pub id: i64,
    pub license_id: String,
    pub verification_status: String,
    pub checked_by: i32,
    pub checked_at: DateTime<Utc>,
}

/// Insertable struct for appending audit entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = verification_logs)]
pub(crate) struct NewVerificationLogRow<'a> {
    pub license_id: &'a str,
    pub verification_status: &'a str,
    pub checked_by: i32,
    pub checked_at: DateTime<Utc>,
}
