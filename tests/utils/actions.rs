#![allow(dead_code)] // Not every flow uses every action

use axum::{
    body::Body,
    http::{header, Request},
};
use serde_json::json;
use tower::ServiceExt; // for `oneshot`

use super::assertions::TestResponse;
use super::setup::TestSetup;

// ============================================================================
// Request Builders
// ============================================================================

const BOUNDARY: &str = "storefront-integration-boundary";

/// Hand-rolled `multipart/form-data` body
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        TestResponse::from_response(response).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(with_token(Request::builder().uri(uri), token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(
            with_token(Request::builder().method("DELETE").uri(uri), token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
        token: Option<&str>,
    ) -> TestResponse {
        let request = with_token(Request::builder().method("POST").uri(uri), token)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send_form(
        &self,
        method: &str,
        uri: &str,
        form: MultipartForm,
        token: Option<&str>,
    ) -> TestResponse {
        let request = with_token(Request::builder().method(method).uri(uri), token)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(form.finish()))
            .unwrap();
        self.send(request).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> TestResponse {
        self.post_json(
            "/register",
            json!({ "username": username, "email": email, "password": password }),
            None,
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.post_json(
            "/login",
            json!({ "username": username, "password": password }),
            None,
        )
        .await
    }

    pub async fn logout(&self, token: &str) -> TestResponse {
        self.send(
            with_token(Request::builder().method("POST").uri("/logout"), Some(token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Registers a user and returns `(user_id, token)`
    pub async fn signed_in_user(&self, username: &str) -> (i64, String) {
        let registered = self
            .register(username, &format!("{}@example.com", username), "secret123")
            .await
            .expect_status(201);
        let user_id = registered.json()["user"]["id"].as_i64().unwrap();

        let login = self.login(username, "secret123").await.expect_status(200);
        let token = login.json()["token"].as_str().unwrap().to_string();

        (user_id, token)
    }
}

fn with_token(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, token),
        None => builder,
    }
}
