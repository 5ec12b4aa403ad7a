//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use qap_api::{AppState, build_router};
use qap_auth::mailer;
use qap_auth::{OutboxMailer, StoreOutboxMailer, VerificationMailer};
use qap_core::config::AppConfig;
use qap_core::config::auth::HashingConfig;
use qap_core::traits::clock::ManualClock;
use qap_service::Services;
use qap_store::StoreManager;

/// Test application context
#[allow(dead_code)]
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Clock driving session expiry and lockout windows
    pub clock: Arc<ManualClock>,
    /// Captured first-access emails
    pub outbox: Arc<OutboxMailer>,
}

#[allow(dead_code)]
impl TestApp {
    /// Create a new test application over a seeded in-memory store
    pub async fn new() -> Self {
        let outbox = Arc::new(OutboxMailer::new());
        let (app, _) = Self::build(Some(outbox)).await;
        app
    }

    /// Create a test application whose first-access mail goes through the
    /// channel selected by `auth.mailer`, plus a reader over the store outbox
    pub async fn with_configured_mailer() -> (Self, StoreOutboxMailer) {
        Self::build(None).await
    }

    async fn build(outbox: Option<Arc<OutboxMailer>>) -> (Self, StoreOutboxMailer) {
        let mut config = AppConfig::default();
        config.auth.hashing = HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };

        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(StoreManager::in_memory());
        let store_outbox = StoreOutboxMailer::new(Arc::clone(&store), clock.clone());
        let delivery: Arc<dyn VerificationMailer> = match &outbox {
            Some(outbox) => Arc::clone(outbox) as Arc<dyn VerificationMailer>,
            None => mailer::from_config(&config.auth, Arc::clone(&store), clock.clone())
                .expect("Failed to build mailer"),
        };

        let services = Services::build(&config, store, clock.clone(), delivery)
            .expect("Failed to build services");
        services.seed_if_empty().await.expect("Failed to seed");

        let router = build_router(AppState::new(config, &services));

        let app = Self {
            router,
            clock,
            outbox: outbox.unwrap_or_default(),
        };
        (app, store_outbox)
    }

    /// Login and return the bearer token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });

        let response = self
            .request("POST", "/api/auth/login", Some(body), None)
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );
        response.token()
    }

    /// Login as the super-administrator and return the bearer token
    pub async fn login_superadmin(&self) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/superadmin",
                Some(serde_json::json!({ "key": "QAP-SUPER-KEY-0001" })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.token()
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            content_type,
            text,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
#[allow(dead_code)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: String,
    /// Raw body
    pub text: String,
    /// Parsed JSON body
    pub body: Value,
}

#[allow(dead_code)]
impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The bearer token of a login response
    pub fn token(&self) -> String {
        self.data()["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// The machine code of an error response
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
