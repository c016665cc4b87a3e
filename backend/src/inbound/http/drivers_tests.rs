//! Tests for driver registry handlers.

use super::*;
use crate::domain::{LicenseId, LicenseStatus};
use crate::inbound::http::test_utils::{
    MockPorts, login_route, session_cookie, test_session_middleware,
};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(ports.into_state())
        .wrap(test_session_middleware())
        .service(login_route())
        .service(
            web::scope("/api/v1")
                .service(list_drivers)
                .service(driver_statistics)
                .service(get_driver)
                .service(register_driver),
        )
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn view(license_id: &str, status: LicenseStatus) -> DriverView {
    DriverView {
        driver_id: 11,
        license_id: LicenseId::new(license_id).expect("valid licence id"),
        full_name: "Abebe Kebede".into(),
        date_of_birth: date(1990, 5, 17),
        license_type: "B".into(),
        expiry_date: date(2030, 5, 17),
        status,
        qr_raw_data: None,
        ocr_raw_text: None,
        created_date: Utc
            .with_ymd_and_hms(2025, 1, 1, 10, 0, 0)
            .single()
            .expect("valid timestamp"),
        registered_by: 7,
        registered_by_username: "officer".into(),
    }
}

#[actix_web::test]
async fn routes_require_session() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;

    for uri in [
        "/api/v1/drivers",
        "/api/v1/drivers/statistics",
        "/api/v1/drivers/DL-100",
    ] {
        let request = actix_test::TestRequest::get().uri(uri).to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/drivers/register")
        .set_json(json!({ "licenseId": "DL-100" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn register_returns_created_driver_for_session_user() {
    let mut ports = MockPorts::default();
    ports
        .drivers
        .expect_register()
        .withf(|draft, registrant| {
            draft.license_id == "DL-100"
                && draft.date_of_birth == "1990-05-17"
                && draft.qr_raw_data.as_deref() == Some("DL-100|Abebe")
                && registrant.get() == 7
        })
        .times(1)
        .returning(|draft, _| Ok(view(&draft.license_id, LicenseStatus::Active)));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, 7).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/drivers/register")
        .cookie(cookie)
        .set_json(json!({
            "licenseId": "DL-100",
            "fullName": "Abebe Kebede",
            "dateOfBirth": "1990-05-17",
            "licenseType": "B",
            "expiryDate": "2030-05-17",
            "qrRawData": "DL-100|Abebe"
        }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["licenseId"], "DL-100");
    assert_eq!(value["status"], "active");
    assert_eq!(value["registeredByUsername"], "officer");
}

#[actix_web::test]
async fn register_maps_conflict_to_409() {
    let mut ports = MockPorts::default();
    ports.drivers.expect_register().returning(|draft, _| {
        Err(Error::conflict(format!(
            "License ID {} is already registered in the system",
            draft.license_id
        ))
        .with_details(json!({ "licenseId": draft.license_id, "status": "expired" })))
    });
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, 7).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/drivers/register")
        .cookie(cookie)
        .set_json(json!({ "licenseId": "DL-100" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["code"], "conflict");
    assert_eq!(value["details"]["status"], "expired");
}

#[actix_web::test]
async fn missing_fields_reach_validation_as_blanks() {
    let mut ports = MockPorts::default();
    ports
        .drivers
        .expect_register()
        .withf(|draft, _| draft.full_name.is_empty() && draft.ocr_raw_text.is_none())
        .returning(|_, _| Err(Error::invalid_request("Full name is required")));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, 7).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/drivers/register")
        .cookie(cookie)
        .set_json(json!({ "licenseId": "DL-100" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn statistics_route_is_not_shadowed_by_licence_lookup() {
    let mut ports = MockPorts::default();
    ports.drivers_query.expect_get_driver().times(0);
    ports.drivers_query.expect_statistics().times(1).returning(|| {
        Ok(DriverStatistics {
            total_drivers: 3,
            active_drivers: 2,
            expired_drivers: 1,
        })
    });
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, 7).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/drivers/statistics")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        value,
        json!({ "totalDrivers": 3, "activeDrivers": 2, "expiredDrivers": 1 })
    );
}

#[actix_web::test]
async fn get_driver_passes_path_and_maps_not_found() {
    let mut ports = MockPorts::default();
    ports
        .drivers_query
        .expect_get_driver()
        .withf(|id| id == "GHOST-1")
        .returning(|id| Err(Error::not_found(format!("No driver found with license ID: {id}"))));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, 7).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/drivers/GHOST-1")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let value: Value = actix_test::read_body_json(response).await;
    assert_eq!(value["message"], "No driver found with license ID: GHOST-1");
}

#[actix_web::test]
async fn list_drivers_returns_views() {
    let mut ports = MockPorts::default();
    ports.drivers_query.expect_list_drivers().returning(|| {
        Ok(vec![
            view("DL-200", LicenseStatus::Expired),
            view("DL-100", LicenseStatus::Active),
        ])
    });
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, 7).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/drivers")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let value: Value = actix_test::read_body_json(response).await;
    let ids: Vec<&str> = value
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|driver| driver["licenseId"].as_str())
        .collect();
    assert_eq!(ids, ["DL-200", "DL-100"]);
    assert_eq!(value[0]["status"], "expired");
}
