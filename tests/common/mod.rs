#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use bookreview::{
    ServerConfig, create_app,
    db::Database,
    jwt::TokenCodec,
    session::SessionSettings,
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret";

pub struct TestApp {
    pub app: Router,
    pub db: Database,
    pub codec: TokenCodec,
}

/// Create a test app backed by an in-memory database.
pub async fn create_test_app() -> TestApp {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: TEST_SECRET.to_vec(),
        session: SessionSettings {
            bcrypt_cost: 4,
            ..SessionSettings::default()
        },
    };
    TestApp {
        app: create_app(&config).expect("Failed to create app"),
        db,
        codec: TokenCodec::new(TEST_SECRET).expect("Failed to create codec"),
    }
}

impl TestApp {
    /// Send one operation, returning the status and the parsed body.
    pub async fn call(
        &self,
        operation: &str,
        variables: Value,
        bearer: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method("POST")
            .uri("/graphql")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = json!({ "operationName": operation, "variables": variables });
        let request = request.body(Body::from(body.to_string())).unwrap();

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn register(&self, email: &str, username: &str, password: &str) -> Value {
        let (status, body) = self
            .call(
                "register",
                json!({ "email": email, "username": username, "password": password }),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        body["data"]["register"].clone()
    }

    /// Log in and return (access_token, refresh_token).
    pub async fn login(&self, email: &str, password: &str) -> (String, String) {
        let (status, body) = self
            .call("login", json!({ "email": email, "password": password }), None)
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        let tokens = &body["data"]["login"];
        (
            tokens["accessToken"].as_str().unwrap().to_string(),
            tokens["refreshToken"].as_str().unwrap().to_string(),
        )
    }
}

/// Extract `(code, reason, message)` from the first error of a response body.
pub fn first_error(body: &Value) -> (String, Option<String>, String) {
    let error = &body["errors"][0];
    (
        error["extensions"]["code"].as_str().unwrap().to_string(),
        error["extensions"]["reason"].as_str().map(str::to_string),
        error["message"].as_str().unwrap().to_string(),
    )
}
