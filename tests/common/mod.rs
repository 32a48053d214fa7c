#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use shelf_app::Services;
use shelf_db::{Book, InMemoryBookStore};
use shelf_kernel::settings::Settings;

pub struct TestApp {
    pub router: Router,
    pub services: Services,
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    // cheap hashing keeps the suite fast
    settings.auth.hash_memory_kib = 1024;
    settings.auth.hash_iterations = 1;
    settings.auth.jwt_secret = "integration-test-secret".to_string();
    settings
}

pub fn build_book(id: &str) -> Book {
    Book {
        id: id.to_string(),
        title: format!("Book {id}"),
        author: "Test Author".to_string(),
        cover_image_url: format!("https://covers.example.com/{id}.jpg"),
        page_count: 321,
        publisher: "Test Press".to_string(),
        synopsis: "A book written for tests.".to_string(),
    }
}

pub fn spawn_app(books: Vec<Book>) -> TestApp {
    let settings = test_settings();
    let services = Services::with_books(&settings, Arc::new(InMemoryBookStore::from_books(books)))
        .expect("services build");
    let registry = shelf_app::registry(&services).expect("modules register");
    let router = shelf_http::build_router(&registry, &settings);

    TestApp { router, services }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        match body {
            Some(body) => {
                self.send_raw(method, uri, token, Some("application/json"), &body.to_string())
                    .await
            }
            None => self.send_raw(method, uri, token, None, "").await,
        }
    }

    /// Send `body` verbatim with the given content type, if any.
    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder
            .body(Body::from(body.to_string()))
            .expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    /// Register a user and return `(id, token)`.
    pub async fn register(&self, username: &str, password: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/register",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        (
            body["user"]["id"].as_str().unwrap().to_string(),
            body["user"]["token"].as_str().unwrap().to_string(),
        )
    }
}
