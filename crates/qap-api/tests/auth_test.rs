//! Integration tests for the authentication endpoints.

mod helpers;

use axum::http::StatusCode;
use chrono::Duration;

#[tokio::test]
async fn test_login_success() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "admin@qap.local",
                "password": "Admin!123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert!(response.data()["token"].as_str().unwrap().starts_with("qap_"));
    assert_eq!(response.data()["account"]["role"], "ADMIN");
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "admin@qap.local",
                "password": "wrongpassword",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_login_disabled_account() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "joao.santos@pm.gov.br",
                "password": "Policial123!",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.error_code(), "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn test_lockout_returns_remaining_minutes() {
    let app = helpers::TestApp::new().await;
    let body = serde_json::json!({ "email": "x@y.com", "password": "nope" });

    for _ in 0..5 {
        let response = app
            .request("POST", "/api/auth/login", Some(body.clone()), None)
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let response = app
        .request("POST", "/api/auth/login", Some(body), None)
        .await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.error_code(), "LOCKED_OUT");
    assert_eq!(response.body["details"]["remaining_minutes"], 5);
}

#[tokio::test]
async fn test_session_endpoint_requires_live_token() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/api/auth/session", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "SESSION_INVALID");

    let token = app.login("admin@qap.local", "Admin!123").await;
    let response = app
        .request("GET", "/api/auth/session", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["account"]["email"], "admin@qap.local");
    assert!(response.data().get("token").is_none());

    app.clock.advance(Duration::hours(8));
    let response = app
        .request("GET", "/api/auth/session", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_new_login_invalidates_previous_token() {
    let app = helpers::TestApp::new().await;

    let first = app.login("admin@qap.local", "Admin!123").await;
    let _second = app.login("carlos.silva@pm.gov.br", "Policial123!").await;

    let response = app
        .request("GET", "/api/auth/session", None, Some(&first))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = helpers::TestApp::new().await;
    let token = app.login("admin@qap.local", "Admin!123").await;

    let response = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/auth/session", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_superadmin_login() {
    let app = helpers::TestApp::new().await;
    let token = app.login_superadmin().await;

    let response = app
        .request("GET", "/api/auth/session", None, Some(&token))
        .await;
    assert_eq!(response.data()["account"]["role"], "SUPER_ADMIN");

    let response = app
        .request(
            "POST",
            "/api/auth/superadmin",
            Some(serde_json::json!({ "key": "wrong" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "INVALID_KEY");
}

#[tokio::test]
async fn test_first_access_on_confirmed_account_conflicts() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/first-access",
            Some(serde_json::json!({ "email": "admin@qap.local" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.error_code(), "ALREADY_CONFIRMED");

    let response = app
        .request(
            "POST",
            "/api/auth/first-access",
            Some(serde_json::json!({ "email": "ghost@qap.local" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_define_password_rejects_bad_token_and_weak_password() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request(
            "POST",
            "/api/auth/password",
            Some(serde_json::json!({ "token": "qap_bogus", "password": "Valid#Pass1" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "INVALID_TOKEN");

    let admin = app.login("admin@qap.local", "Admin!123").await;
    let created = app
        .request(
            "POST",
            "/api/admin/users",
            Some(serde_json::json!({
                "name": "Sd. Maria Lima",
                "email": "maria.lima@pm.gov.br",
                "national_id": "529.982.247-25",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);

    let response = app
        .request(
            "POST",
            "/api/auth/first-access",
            Some(serde_json::json!({ "email": "maria.lima@pm.gov.br" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let token = app.outbox.last_token_for("maria.lima@pm.gov.br").unwrap();

    let response = app
        .request(
            "POST",
            "/api/auth/password",
            Some(serde_json::json!({ "token": token, "password": "alllowercase1" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.body["details"],
        serde_json::json!([{ "rule": "UPPERCASE" }, { "rule": "SYMBOL" }])
    );

    let response = app
        .request(
            "POST",
            "/api/auth/password",
            Some(serde_json::json!({ "token": token, "password": "Valid#Pass1" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    app.login("maria.lima@pm.gov.br", "Valid#Pass1").await;
}

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
}

#[tokio::test]
async fn test_created_operative_completes_first_access_through_outbox() {
    let (app, outbox) = helpers::TestApp::with_configured_mailer().await;
    let admin = app.login("admin@qap.local", "Admin!123").await;

    let created = app
        .request(
            "POST",
            "/api/admin/users",
            Some(serde_json::json!({
                "name": "Sd. Maria Lima",
                "email": "maria.lima@pm.gov.br",
                "national_id": "529.982.247-25",
            })),
            Some(&admin),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK, "{:?}", created.body);
    let id = created.data()["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "POST",
            "/api/auth/first-access",
            Some(serde_json::json!({ "email": "maria.lima@pm.gov.br" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let token = outbox
        .last_token_for("maria.lima@pm.gov.br")
        .await
        .unwrap()
        .expect("token queued in outbox");
    let response = app
        .request(
            "POST",
            "/api/auth/password",
            Some(serde_json::json!({ "token": token, "password": "Valid#Pass1" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    app.login("maria.lima@pm.gov.br", "Valid#Pass1").await;

    // An admin reset sends a fresh token through the same channel.
    let admin = app.login("admin@qap.local", "Admin!123").await;
    let response = app
        .request(
            "POST",
            &format!("/api/admin/users/{id}/reset-password"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let fresh = outbox
        .last_token_for("maria.lima@pm.gov.br")
        .await
        .unwrap()
        .expect("reset token queued in outbox");
    assert_ne!(fresh, token);
    let response = app
        .request(
            "POST",
            "/api/auth/password",
            Some(serde_json::json!({ "token": fresh, "password": "Other#Pass2" })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    app.login("maria.lima@pm.gov.br", "Other#Pass2").await;
}
