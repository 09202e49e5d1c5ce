#![allow(dead_code)]

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use tower::ServiceExt;

use ::common::prelude::ObjectStorage;
use treefs::ServiceState;

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Reply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap()
    }
}

/// A router over fresh in-memory storage, plus the state behind it.
pub fn setup_test_env() -> (Router, ServiceState) {
    let state = ServiceState::from_storage(ObjectStorage::memory());
    (treefs::http_server::router(state.clone()), state)
}

pub async fn send(router: &Router, request: Request<Body>) -> Reply {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    Reply {
        status,
        headers,
        body,
    }
}

pub fn request(method: Method, uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(body.into())
        .unwrap()
}

pub fn json_request(method: Method, uri: &str, value: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(value.to_string()))
        .unwrap()
}

/// Sign up `username` and return the issued token.
pub async fn signup(router: &Router, username: &str) -> String {
    let reply = send(
        router,
        json_request(
            Method::POST,
            "/signup",
            serde_json::json!({"username": username, "password": "secret"}),
        ),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["status"], "succeed");
    body["token"].as_str().unwrap().to_string()
}

pub async fn write(router: &Router, token: &str, path: &str, content: &str) -> Reply {
    send(
        router,
        request(
            Method::POST,
            &format!("/file{}?token={}", path, token),
            content.to_string(),
        ),
    )
    .await
}

pub async fn read(router: &Router, token: &str, path: &str) -> Reply {
    send(
        router,
        request(
            Method::GET,
            &format!("/file{}?token={}", path, token),
            Body::empty(),
        ),
    )
    .await
}
