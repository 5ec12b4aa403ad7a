//! Integration tests for account administration and audit endpoints.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_list_operatives_with_filters() {
    let app = helpers::TestApp::new().await;
    let token = app.login("admin@qap.local", "Admin!123").await;

    let response = app
        .request("GET", "/api/admin/users", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total_items"], 3);

    let response = app
        .request(
            "GET",
            "/api/admin/users?active=false&page=1&per_page=10",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.data()["total_items"], 1);
    assert_eq!(
        response.data()["items"][0]["email"],
        "joao.santos@pm.gov.br"
    );

    let response = app
        .request("GET", "/api/admin/users?q=costa", None, Some(&token))
        .await;
    assert_eq!(response.data()["total_items"], 1);
}

#[tokio::test]
async fn test_operative_cannot_administer() {
    let app = helpers::TestApp::new().await;
    let token = app.login("carlos.silva@pm.gov.br", "Policial123!").await;

    let response = app
        .request("GET", "/api/admin/users", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request("GET", "/api/admin/audit", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_operative_validates_fields() {
    let app = helpers::TestApp::new().await;
    let token = app.login("admin@qap.local", "Admin!123").await;

    let response = app
        .request(
            "POST",
            "/api/admin/users",
            Some(serde_json::json!({
                "name": "Cpf Ruim",
                "email": "ruim@pm.gov.br",
                "national_id": "123.456.789-00",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "VALIDATION_ERROR");

    let response = app
        .request(
            "POST",
            "/api/admin/users",
            Some(serde_json::json!({
                "name": "Duplicado",
                "email": "carlos.silva@pm.gov.br",
                "national_id": "529.982.247-25",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_toggle_and_update_operative() {
    let app = helpers::TestApp::new().await;
    let token = app.login("admin@qap.local", "Admin!123").await;

    let response = app
        .request("GET", "/api/admin/users?q=ana.costa", None, Some(&token))
        .await;
    let id = response.data()["items"][0]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/users/{id}"),
            Some(serde_json::json!({ "name": "Sgt. Ana Paula Costa" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "Sgt. Ana Paula Costa");

    let response = app
        .request(
            "POST",
            &format!("/api/admin/users/{id}/active"),
            Some(serde_json::json!({ "active": false })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["active"], false);

    let response = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "ana.costa@pm.gov.br",
                "password": "Policial123!",
            })),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_import_reports_rejected_lines() {
    let app = helpers::TestApp::new().await;
    let token = app.login("admin@qap.local", "Admin!123").await;

    let response = app
        .request(
            "POST",
            "/api/admin/users/import",
            Some(serde_json::json!({
                "rows": [
                    { "name": "Sd. Pedro Alves", "email": "pedro.alves@pm.gov.br", "national_id": "111.444.777-35" },
                    { "name": "Sem Cpf", "email": "semcpf@pm.gov.br" },
                    { "name": "Carlos de Novo", "email": "carlos.silva@pm.gov.br", "national_id": "529.982.247-25" }
                ]
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.data()["total"], 3);
    assert_eq!(response.data()["inserted"], 1);
    assert_eq!(response.data()["duplicates"], 1);
    assert_eq!(
        response.data()["errors"],
        serde_json::json!([{ "line": 2, "reason": "Incomplete data" }])
    );
}

#[tokio::test]
async fn test_superadmin_manages_admins() {
    let app = helpers::TestApp::new().await;

    let admin = app.login("admin@qap.local", "Admin!123").await;
    let response = app
        .request("GET", "/api/superadmin/admins", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let root = app.login_superadmin().await;
    let response = app
        .request(
            "POST",
            "/api/superadmin/admins",
            Some(serde_json::json!({
                "name": "Admin Regional",
                "email": "regional@qap.local",
                "national_id": "529.982.247-25",
            })),
            Some(&root),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["role"], "ADMIN");
    let id = response.data()["id"].as_str().unwrap().to_string();

    let response = app
        .request("GET", "/api/superadmin/admins", None, Some(&root))
        .await;
    assert_eq!(response.data()["total_items"], 2);

    let response = app
        .request(
            "DELETE",
            &format!("/api/superadmin/admins/{id}"),
            None,
            Some(&root),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("GET", "/api/superadmin/admins", None, Some(&root))
        .await;
    assert_eq!(response.data()["total_items"], 1);
}

#[tokio::test]
async fn test_audit_search_and_export() {
    let app = helpers::TestApp::new().await;
    app.request(
        "POST",
        "/api/auth/login",
        Some(serde_json::json!({ "email": "x@y.com", "password": "nope" })),
        None,
    )
    .await;
    let token = app.login("admin@qap.local", "Admin!123").await;

    let response = app
        .request("GET", "/api/admin/audit?kind=LOGIN_FAILED", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total_items"], 1);
    assert_eq!(response.data()["items"][0]["actor_name"], "x@y.com");

    let response = app
        .request("GET", "/api/admin/audit/export", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.content_type.starts_with("text/csv"));
    assert!(
        response
            .text
            .starts_with("\"ID\",\"Type\",\"Actor\",\"Role\",\"Detail\",\"Timestamp\"\n")
    );
    assert!(response.text.contains("\"LOGIN_FAILED\""));
}

#[tokio::test]
async fn test_out_of_range_page_is_empty() {
    let app = helpers::TestApp::new().await;
    let admin = app.login("admin@qap.local", "Admin!123").await;

    for path in [
        "/api/admin/users?page=18446744073709551615",
        "/api/admin/audit?page=18446744073709551615",
    ] {
        let response = app.request("GET", path, None, Some(&admin)).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert_eq!(response.data()["items"], serde_json::json!([]));
        assert_eq!(response.data()["has_next"], false);
    }

    let root = app.login_superadmin().await;
    let response = app
        .request(
            "GET",
            "/api/superadmin/admins?page=18446744073709551615&per_page=100",
            None,
            Some(&root),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["items"], serde_json::json!([]));
}
