#![allow(dead_code)]

/// Common test utilities for API integration tests
///
/// Each [`TestContext`] builds the full router over a fresh `MemoryStore`,
/// so tests need no database and never share state.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use rollcall_api::app::{build_router, AppState};
use rollcall_api::config::Config;
use rollcall_shared::auth::password::{Argon2Hasher, HasherParams};
use rollcall_shared::services::SchoolService;
use rollcall_shared::store::MemoryStore;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

pub const JWT_SECRET: &str = "api-test-secret-that-is-long-enough-123";
pub const PRINCIPAL_EMAIL: &str = "principal@school.org";
pub const PRINCIPAL_PASSWORD: &str = "principal-password";
pub const TEACHER_PASSWORD: &str = "teacher-password";
pub const STUDENT_PASSWORD: &str = "student-password";

/// Test context containing the router and the store behind it
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
    pub config: Config,
}

/// A decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
}

impl TestContext {
    pub async fn new() -> Self {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgresql://unused/rollcall_test"),
            ("JWT_SECRET", JWT_SECRET),
            ("PRINCIPAL_EMAIL", PRINCIPAL_EMAIL),
            ("PRINCIPAL_PASSWORD", PRINCIPAL_PASSWORD),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
            .expect("test config should load");

        let store = Arc::new(MemoryStore::new());
        let hasher = Argon2Hasher::new(HasherParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        });
        let school = SchoolService::new(store.clone(), Arc::new(hasher));

        school
            .bootstrap_principal(PRINCIPAL_EMAIL, PRINCIPAL_PASSWORD)
            .await
            .expect("bootstrap should succeed");

        let app = build_router(AppState::new(school, config.clone()));

        Self { app, store, config }
    }

    /// Sends a request and decodes the JSON body (`Null` when empty)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send("POST", uri, token, Some(body)).await
    }

    /// Logs in and returns the access token
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .post(
                "/v1/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.body["access_token"]
            .as_str()
            .expect("access_token should be a string")
            .to_string()
    }

    pub async fn principal_token(&self) -> String {
        self.login(PRINCIPAL_EMAIL, PRINCIPAL_PASSWORD).await
    }

    /// Creates a teacher through the API; returns its view and a token
    pub async fn teacher(&self, principal: &str, tag: &str) -> (Value, String) {
        let response = self
            .post(
                "/v1/teachers",
                Some(principal),
                json!({
                    "email": format!("{}@school.org", tag),
                    "password": TEACHER_PASSWORD,
                    "name": format!("Teacher {}", tag),
                    "employee_id": format!("EMP-{}", tag),
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        let token = self
            .login(&format!("{}@school.org", tag), TEACHER_PASSWORD)
            .await;
        (response.body, token)
    }

    /// Creates a student assigned to `teacher_id`; returns its view and a token
    pub async fn student(&self, principal: &str, tag: &str, teacher_id: &Value) -> (Value, String) {
        let response = self
            .post(
                "/v1/students",
                Some(principal),
                json!({
                    "email": format!("{}@students.school.org", tag),
                    "password": STUDENT_PASSWORD,
                    "name": format!("Student {}", tag),
                    "roll_number": format!("R-{}", tag),
                    "teacher_id": teacher_id,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        let token = self
            .login(&format!("{}@students.school.org", tag), STUDENT_PASSWORD)
            .await;
        (response.body, token)
    }
}
