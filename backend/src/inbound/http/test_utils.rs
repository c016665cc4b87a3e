//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, Resource, test, web};

use crate::domain::ports::{
    MockDriverCommand, MockDriverQuery, MockLicenseVerification, MockLoginService,
    MockUserProfileQuery, MockVerificationLogQuery,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

const TEST_LOGIN_PATH: &str = "/__test/login";
pub const SESSION_COOKIE: &str = "session";

/// Session middleware with a fresh key, cookie name `session` and the
/// `Secure` flag disabled for plain HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Port mocks for building an [`HttpState`]; unconfigured mocks panic when
/// a handler calls them.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub profile: MockUserProfileQuery,
    pub drivers: MockDriverCommand,
    pub drivers_query: MockDriverQuery,
    pub verification: MockLicenseVerification,
    pub verification_logs: MockVerificationLogQuery,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            login: Arc::new(self.login),
            profile: Arc::new(self.profile),
            drivers: Arc::new(self.drivers),
            drivers_query: Arc::new(self.drivers_query),
            verification: Arc::new(self.verification),
            verification_logs: Arc::new(self.verification_logs),
        }))
    }
}

async fn login_as(session: SessionContext, path: web::Path<i32>) -> Result<HttpResponse, Error> {
    let user_id =
        UserId::new(path.into_inner()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Route that signs the caller in as the user id in the path.
pub fn login_route() -> Resource {
    web::resource(format!("{TEST_LOGIN_PATH}/{{id}}")).route(web::post().to(login_as))
}

/// Sign in through [`login_route`] and return the issued session cookie.
pub async fn session_cookie<S, B>(app: &S, user_id: i32) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri(&format!("{TEST_LOGIN_PATH}/{user_id}"))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "test login failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie issued")
}
