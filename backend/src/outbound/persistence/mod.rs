//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs and the table definitions stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use license_registry::outbound::persistence::{DbPool, DieselDriverRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/registry")).await?;
//! let drivers = DieselDriverRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_driver_repository;
mod diesel_user_repository;
mod diesel_verification_log_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_driver_repository::DieselDriverRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_verification_log_repository::DieselVerificationLogRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
