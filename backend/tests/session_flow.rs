//! Staff sign-in behaviour over the in-memory adapters.

mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{Value, json};

use support::{OFFICER, login, registry_app, seeded_state};

#[actix_web::test]
async fn wrong_password_and_unknown_user_look_the_same() {
    let app = test::init_service(registry_app(seeded_state().await)).await;

    let mut bodies = Vec::new();
    for (username, password) in [(OFFICER, "wrong"), ("nobody", "wrong")] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(json!({ "username": username, "password": password }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(res).await;
        bodies.push(body["message"].clone());
    }
    assert_eq!(bodies[0], bodies[1]);
}

#[actix_web::test]
async fn profile_is_available_after_login() {
    let app = test::init_service(registry_app(seeded_state().await)).await;
    let cookie = login(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["username"], OFFICER);
    assert_eq!(body["status"], "active");
    assert!(body.get("passwordHash").is_none());
}

#[actix_web::test]
async fn logout_expires_the_cookie() {
    let app = test::init_service(registry_app(seeded_state().await)).await;
    let cookie = login(&app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cleared = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("removal cookie");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cleared.into_owned())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
