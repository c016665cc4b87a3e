//! Wiring of domain services onto their store adapters.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use license_registry::domain::ports::{DriverRepository, UserRepository, VerificationLogRepository};
use license_registry::domain::{DriverService, UserAccountService, VerificationService};
use license_registry::inbound::http::state::{HttpState, HttpStatePorts};
use license_registry::outbound::memory::InMemoryRegistry;
use license_registry::outbound::persistence::{
    DbPool, DieselDriverRepository, DieselUserRepository, DieselVerificationLogRepository,
};
use license_registry::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Build handler state from the configured persistence backend.
///
/// A database pool selects the Diesel adapters; without one every port is
/// served by a single shared [`InMemoryRegistry`].
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => diesel_ports(pool, clock),
        None => {
            let registry = Arc::new(InMemoryRegistry::new());
            wire_ports(registry.clone(), registry.clone(), registry, clock)
        }
    };
    web::Data::new(HttpState::new(ports))
}

fn diesel_ports(pool: &DbPool, clock: Arc<dyn Clock>) -> HttpStatePorts {
    wire_ports(
        Arc::new(DieselDriverRepository::new(pool.clone())),
        Arc::new(DieselVerificationLogRepository::new(pool.clone())),
        Arc::new(DieselUserRepository::new(pool.clone())),
        clock,
    )
}

fn wire_ports<D, L, U>(
    drivers: Arc<D>,
    logs: Arc<L>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    D: DriverRepository + 'static,
    L: VerificationLogRepository + 'static,
    U: UserRepository + 'static,
{
    let accounts = Arc::new(UserAccountService::new(
        users,
        Arc::new(Argon2PasswordHasher::default()),
    ));
    let registry = Arc::new(DriverService::new(drivers.clone(), clock.clone()));
    let verification = Arc::new(VerificationService::new(drivers, logs, clock));
    HttpStatePorts {
        login: accounts.clone(),
        profile: accounts,
        drivers: registry.clone(),
        drivers_query: registry,
        verification: verification.clone(),
        verification_logs: verification,
    }
}
