#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use rollcalld::http::ApiServer;
use rollcalld::store::Store;
use serde_json::{json, Value};
use tower::ServiceExt;

pub fn app() -> Router {
    let store = Store::in_memory().expect("in-memory store");
    ApiServer::new(Arc::new(store)).router()
}

pub async fn request(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method.clone()).uri(path);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let resp = app.clone().oneshot(req).await.expect("router is infallible");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            panic!(
                "{} {} returned non-json body ({e}): {}",
                method,
                path,
                String::from_utf8_lossy(&bytes)
            )
        })
    };
    (status, value)
}

pub async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    request(app, Method::GET, path, None).await
}

pub async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    request(app, Method::POST, path, Some(body)).await
}

pub async fn patch(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    request(app, Method::PATCH, path, Some(body)).await
}

pub async fn delete(app: &Router, path: &str) -> (StatusCode, Value) {
    request(app, Method::DELETE, path, None).await
}

pub async fn post_created(app: &Router, path: &str, body: Value) -> Value {
    let (status, value) = post(app, path, body.clone()).await;
    assert_eq!(status, StatusCode::CREATED, "POST {path} {body} -> {value}");
    value
}

pub fn id_of(value: &Value) -> i64 {
    value.get("id").and_then(|v| v.as_i64()).expect("id")
}

pub async fn seed_class(app: &Router, name: &str) -> i64 {
    id_of(&post_created(app, "/class", json!({ "name": name })).await)
}

pub async fn seed_student(app: &Router, name: &str, class_id: i64) -> i64 {
    id_of(&post_created(app, "/student", json!({ "name": name, "in_class": class_id })).await)
}

pub async fn count(app: &Router, path: &str) -> usize {
    let (status, value) = get(app, path).await;
    assert_eq!(status, StatusCode::OK);
    value.as_array().expect("array").len()
}

pub fn detail(problem: &Value) -> &str {
    problem.get("detail").and_then(|v| v.as_str()).unwrap_or("")
}
