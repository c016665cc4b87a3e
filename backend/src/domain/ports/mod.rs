//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) are implemented by
//! outbound adapters. Driving ports are implemented by domain services and
//! called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod driver_command;
mod driver_query;
mod driver_repository;
mod license_verification;
mod login_service;
mod password_hasher;
mod user_administration;
mod user_profile_query;
mod user_repository;
mod verification_log_query;
mod verification_log_repository;

pub use driver_command::DriverCommand;
#[cfg(test)]
pub use driver_command::MockDriverCommand;
pub use driver_query::DriverQuery;
#[cfg(test)]
pub use driver_query::MockDriverQuery;
#[cfg(test)]
pub use driver_repository::MockDriverRepository;
pub use driver_repository::{DriverRepository, DriverRepositoryError};
pub use license_verification::LicenseVerification;
#[cfg(test)]
pub use license_verification::MockLicenseVerification;
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_administration::MockUserAdministration;
pub use user_administration::UserAdministration;
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use verification_log_query::MockVerificationLogQuery;
pub use verification_log_query::VerificationLogQuery;
#[cfg(test)]
pub use verification_log_repository::MockVerificationLogRepository;
pub use verification_log_repository::{VerificationLogRepository, VerificationLogRepositoryError};
