//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DriverCommand, DriverQuery, LicenseVerification, LoginService, UserProfileQuery,
    VerificationLogQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub drivers: Arc<dyn DriverCommand>,
    pub drivers_query: Arc<dyn DriverQuery>,
    pub verification: Arc<dyn LicenseVerification>,
    pub verification_logs: Arc<dyn VerificationLogQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub drivers: Arc<dyn DriverCommand>,
    pub drivers_query: Arc<dyn DriverQuery>,
    pub verification: Arc<dyn LicenseVerification>,
    pub verification_logs: Arc<dyn VerificationLogQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use license_registry::domain::{DriverService, UserAccountService, VerificationService};
    /// use license_registry::inbound::http::state::{HttpState, HttpStatePorts};
    /// use license_registry::outbound::memory::InMemoryRegistry;
    /// use license_registry::outbound::security::Argon2PasswordHasher;
    /// use mockable::DefaultClock;
    ///
    /// let registry = Arc::new(InMemoryRegistry::new());
    /// let clock = Arc::new(DefaultClock);
    /// let users = Arc::new(UserAccountService::new(
    ///     registry.clone(),
    ///     Arc::new(Argon2PasswordHasher::default()),
    /// ));
    /// let drivers = Arc::new(DriverService::new(registry.clone(), clock.clone()));
    /// let verification = Arc::new(VerificationService::new(registry.clone(), registry, clock));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: users.clone(),
    ///     profile: users,
    ///     drivers: drivers.clone(),
    ///     drivers_query: drivers,
    ///     verification: verification.clone(),
    ///     verification_logs: verification,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            profile,
            drivers,
            drivers_query,
            verification,
            verification_logs,
        } = ports;
        Self {
            login,
            profile,
            drivers,
            drivers_query,
            verification,
            verification_logs,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
