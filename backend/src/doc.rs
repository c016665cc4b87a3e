//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every REST handler and the schemas they exchange. The
//! document backs Swagger UI in debug builds and is printed by
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    DriverStatistics, DriverView, Error, ErrorCode, LicenseStatus, User, UserAccountStatus,
    VerificationLogView, VerificationOutcome, VerificationResult,
};
use crate::inbound::http::drivers::RegisterDriverRequest;
use crate::inbound::http::users::LoginRequest;
use crate::inbound::http::verification::VerifyRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Driver licence registry API",
        description = "Registration of driver licences and verification of scanned licences, with an audit log of every check."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::drivers::list_drivers,
        crate::inbound::http::drivers::driver_statistics,
        crate::inbound::http::drivers::get_driver,
        crate::inbound::http::drivers::register_driver,
        crate::inbound::http::verification::verify,
        crate::inbound::http::verification::license_status,
        crate::inbound::http::verification::list_logs,
        crate::inbound::http::verification::export_logs,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        UserAccountStatus,
        LoginRequest,
        DriverView,
        DriverStatistics,
        LicenseStatus,
        RegisterDriverRequest,
        VerifyRequest,
        VerificationResult,
        VerificationOutcome,
        VerificationLogView,
    )),
    tags(
        (name = "users", description = "Staff sign-in and profile"),
        (name = "drivers", description = "Driver licence registry"),
        (name = "verification", description = "Licence checks and audit log"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        match schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            other => panic!("expected object schema for {name}, got {other:?}"),
        }
    }

    #[rstest]
    #[case("Error", &["code", "message"])]
    #[case("DriverView", &["licenseId", "status", "registeredByUsername", "createdDate"])]
    #[case("VerificationResult", &["licenseId", "status", "isReal", "isActive", "message"])]
    #[case("VerificationLogView", &["logId", "verificationStatus", "checkedByUsername"])]
    fn schemas_expose_wire_field_names(#[case] schema: &str, #[case] fields: &[&str]) {
        let present = object_fields(schema);
        for field in fields {
            assert!(present.iter().any(|f| f == field), "{schema} lacks {field}");
        }
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/drivers/{licenseId}")]
    #[case("/api/v1/verification/status/{licenseId}")]
    #[case("/api/v1/verification/export")]
    #[case("/health/ready")]
    fn documents_every_route(#[case] path: &str) {
        assert!(ApiDoc::openapi().paths.paths.contains_key(path), "{path}");
    }
}
