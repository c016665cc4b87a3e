//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed entities of the licence registry and
//! the services that operate on them. Nothing in here knows about HTTP or
//! SQL; adapters reach the domain through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - LicenseStatus and [`resolve_status`]: the status resolver.
//! - VerificationService: verification engine and audit log queries.
//! - DriverService: registration and driver queries.
//! - UserAccountService: sign-in, profiles and account creation.

pub mod auth;
pub mod driver;
mod driver_service;
pub mod error;
pub mod license;
pub mod ports;
pub mod registration;
pub mod trace_id;
pub mod user;
mod user_service;
pub mod verification;
mod verification_service;

#[cfg(test)]
pub(crate) mod service_test_helpers;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::driver::{
    DriverRecord, DriverStatistics, DriverView, NewDriver, RegisteredDriver, UNKNOWN_USERNAME,
};
pub use self::driver_service::DriverService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::license::{
    LICENSE_ID_MAX, LicenseId, LicenseIdValidationError, LicenseStatus, effective_status,
    resolve_status,
};
pub use self::registration::{
    FULL_NAME_MAX, LICENSE_TYPE_MAX, RegistrationDraft, RegistrationField,
    RegistrationValidationError, validate_registration,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    NewUser, USERNAME_MAX, User, UserAccountStatus, UserCredentialsRecord, UserId,
    UserValidationError, Username,
};
pub use self::user_service::UserAccountService;
pub use self::verification::{
    ANONYMOUS_USERNAME, Checker, NewVerificationLogEntry, VerificationLogEntry,
    VerificationLogExport, VerificationLogFilter, VerificationLogRecord, VerificationLogView, VerificationOutcome,
    VerificationRequest, VerificationResult, qr_payload_matches,
};
pub use self::verification_service::VerificationService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use license_registry::domain::{ApiResult, Error};
///
/// fn lookup(found: bool) -> ApiResult<&'static str> {
///     if found { Ok("DL-100") } else { Err(Error::not_found("no such licence")) }
/// }
///
/// assert!(lookup(false).is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
