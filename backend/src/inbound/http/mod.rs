//! HTTP inbound adapter exposing REST endpoints.

pub mod drivers;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod verification;
pub mod verification_csv;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Static driver routes are registered ahead of `/drivers/{license_id}` so
/// they are not captured by it.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(drivers::list_drivers)
        .service(drivers::driver_statistics)
        .service(drivers::register_driver)
        .service(drivers::get_driver)
        .service(verification::verify)
        .service(verification::license_status)
        .service(verification::list_logs)
        .service(verification::export_logs);
}
