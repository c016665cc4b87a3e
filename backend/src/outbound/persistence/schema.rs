//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Staff accounts.
    users (id) {
        id -> Int4,
        /// Unique login name (max 50 characters).
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        /// `active` or `disabled`.
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered driver licences.
    drivers (id) {
        id -> Int4,
        /// Unique, case-sensitive licence identifier.
        license_id -> Varchar,
        full_name -> Varchar,
        date_of_birth -> Date,
        license_type -> Varchar,
        expiry_date -> Date,
        qr_raw_data -> Nullable<Text>,
        ocr_raw_text -> Nullable<Text>,
        created_at -> Timestamptz,
        registered_by -> Int4,
        /// Display status captured at registration time.
        status -> Varchar,
    }
}

diesel::table! {
    /// Append-only audit log of verification attempts.
    verification_logs (id) {
        id -> Int8,
        license_id -> Text,
        /// `fake`, `active` or `expired`.
        verification_status -> Varchar,
        /// Checking user id, `0` for anonymous checks.
        checked_by -> Int4,
        checked_at -> Timestamptz,
    }
}

diesel::joinable!(drivers -> users (registered_by));

diesel::allow_tables_to_appear_in_same_query!(users, drivers, verification_logs);
