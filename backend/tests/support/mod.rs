//! Shared fixtures for HTTP integration tests over the in-memory registry.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use chrono::{DateTime, TimeZone, Utc};
use license_registry::Trace;
use license_registry::domain::ports::UserAdministration;
use license_registry::domain::{DriverService, UserAccountService, VerificationService};
use license_registry::inbound::http::configure_api;
use license_registry::inbound::http::state::{HttpState, HttpStatePorts};
use license_registry::outbound::memory::InMemoryRegistry;
use license_registry::outbound::security::Argon2PasswordHasher;
use mockable::Clock;
use serde_json::json;

pub const OFFICER: &str = "officer";
pub const PASSWORD: &str = "correct horse battery staple";

/// Clock pinned to 2025-01-01T10:00:00Z.
pub struct FixedClock;

impl FixedClock {
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp")
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<chrono::Local> {
        Self::now().with_timezone(&chrono::Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Self::now()
    }
}

/// In-memory application state with one active staff account.
pub async fn seeded_state() -> web::Data<HttpState> {
    let registry = Arc::new(InMemoryRegistry::new());
    let clock: Arc<dyn Clock> = Arc::new(FixedClock);
    let accounts = Arc::new(UserAccountService::new(
        registry.clone(),
        Arc::new(Argon2PasswordHasher::default()),
    ));
    accounts
        .create_user(OFFICER, PASSWORD)
        .await
        .expect("seed officer account");
    let drivers = Arc::new(DriverService::new(registry.clone(), clock.clone()));
    let verification = Arc::new(VerificationService::new(registry.clone(), registry, clock));
    web::Data::new(HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        profile: accounts,
        drivers: drivers.clone(),
        drivers_query: drivers,
        verification: verification.clone(),
        verification_logs: verification,
    }))
}

/// Application wired like the server binary, minus docs and metrics.
pub fn registry_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();
    App::new()
        .app_data(state)
        .wrap(Trace)
        .service(web::scope("/api/v1").wrap(session).configure(configure_api))
}

/// Log in as the seeded officer and return the session cookie.
pub async fn login<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": OFFICER, "password": PASSWORD }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}
