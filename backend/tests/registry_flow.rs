//! End-to-end registry scenarios over the in-memory adapters.

mod support;

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test;
use license_registry::domain::TRACE_ID_HEADER;
use rstest::rstest;
use serde_json::{Value, json};

use support::{login, registry_app, seeded_state};

fn registration(license_id: &str, expiry: &str) -> Value {
    json!({
        "licenseId": license_id,
        "fullName": "Abebe Kebede",
        "dateOfBirth": "1990-05-17",
        "licenseType": "B",
        "expiryDate": expiry,
        "qrRawData": format!("{license_id}|B")
    })
}

#[actix_web::test]
async fn registration_verification_and_audit_round_trip() {
    let app = test::init_service(registry_app(seeded_state().await)).await;
    let cookie = login(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/drivers/register")
            .cookie(cookie.clone())
            .set_json(registration("DL-100", "2030-05-17"))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let driver: Value = test::read_body_json(res).await;
    assert_eq!(driver["status"], "active");
    assert_eq!(driver["registeredByUsername"], "officer");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/verification/verify")
            .cookie(cookie.clone())
            .set_json(json!({ "licenseId": "DL-100", "scannedQrData": "dl-100|b" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let result: Value = test::read_body_json(res).await;
    assert_eq!(result["status"], "active");
    assert_eq!(result["driverName"], "Abebe Kebede");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/verification/verify")
            .cookie(cookie.clone())
            .set_json(json!({ "licenseId": "GHOST-1" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let result: Value = test::read_body_json(res).await;
    assert_eq!(result["status"], "fake");
    assert_eq!(
        result["message"],
        "This license is fake and not found in our central registry"
    );

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/verification/status/GHOST-2")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/verification/logs")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let logs: Value = test::read_body_json(res).await;
    let summary: Vec<(&str, &str, &str)> = logs
        .as_array()
        .expect("log array")
        .iter()
        .map(|log| {
            (
                log["licenseId"].as_str().expect("licence id"),
                log["verificationStatus"].as_str().expect("status"),
                log["checkedByUsername"].as_str().expect("username"),
            )
        })
        .collect();
    assert_eq!(
        summary,
        [
            ("GHOST-2", "fake", "anonymous"),
            ("GHOST-1", "fake", "officer"),
            ("DL-100", "active", "officer"),
        ]
    );

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/verification/export?userId=0")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        res.headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("VerificationLogs_20250101.csv"))
    );
    let body = test::read_body(res).await;
    let csv = std::str::from_utf8(&body).expect("utf-8 csv");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "LogId,LicenseId,Status,CheckedBy,CheckedDate");
    assert!(lines[1].ends_with(",GHOST-2,fake,anonymous,2025-01-01 10:00:00"));
}

#[actix_web::test]
async fn duplicate_registration_reports_current_status() {
    let app = test::init_service(registry_app(seeded_state().await)).await;
    let cookie = login(&app).await;

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/drivers/register")
                .cookie(cookie.clone())
                .set_json(registration("DL-200", "2025-06-30"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), expected);
        if expected == StatusCode::CONFLICT {
            let body: Value = test::read_body_json(res).await;
            assert_eq!(
                body["message"],
                "License ID DL-200 is already registered in the system"
            );
            assert_eq!(body["details"], json!({ "licenseId": "DL-200", "status": "active" }));
        }
    }

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/drivers")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let drivers: Vec<Value> = test::read_body_json(res).await;
    let matching = drivers
        .iter()
        .filter(|driver| driver["licenseId"] == "DL-200")
        .count();
    assert_eq!(matching, 1);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/drivers/statistics")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let stats: Value = test::read_body_json(res).await;
    assert_eq!(stats["totalDrivers"], 1);
}

#[rstest]
#[case("2024-12-31", "expired")]
#[case("2025-01-01", "active")]
#[case("2025-01-02", "active")]
#[actix_web::test]
async fn statistics_and_status_share_the_expiry_rule(
    #[case] expiry: &str,
    #[case] expected: &str,
) {
    let app = test::init_service(registry_app(seeded_state().await)).await;
    let cookie = login(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/drivers/register")
            .cookie(cookie.clone())
            .set_json(registration("DL-300", expiry))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/verification/status/DL-300")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let result: Value = test::read_body_json(res).await;
    assert_eq!(result["status"], expected);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/drivers/statistics")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let stats: Value = test::read_body_json(res).await;
    let (active, expired) = if expected == "active" { (1, 0) } else { (0, 1) };
    assert_eq!(
        stats,
        json!({ "totalDrivers": 1, "activeDrivers": active, "expiredDrivers": expired })
    );
}

#[rstest]
#[case("17/05/2030", "invalid_date")]
#[case("2020-01-01", "expiry_passed")]
#[actix_web::test]
async fn invalid_expiry_names_the_field(#[case] expiry: &str, #[case] code: &str) {
    let app = test::init_service(registry_app(seeded_state().await)).await;
    let cookie = login(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/drivers/register")
            .cookie(cookie)
            .set_json(registration("DL-400", expiry))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "expiryDate");
    assert_eq!(body["details"]["code"], code);
}
