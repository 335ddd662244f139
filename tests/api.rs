//! HTTP-level tests driving the full router against the in-memory store
//! and lock.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use resource_booking::auth::{StaticTokenAuthenticator, TokenGrant};
use resource_booking::lock::LockSettings;
use resource_booking::{build_app, in_memory_state};

const ADMIN: &str = "admin-token";
const USER: &str = "user-token";

fn app() -> Router {
    let grants = [format!("{ADMIN}=1:admin"), format!("{USER}=2:user")]
        .iter()
        .filter_map(|g| TokenGrant::parse(g))
        .collect::<Vec<_>>();
    let state = in_memory_state(
        LockSettings::default(),
        Arc::new(StaticTokenAuthenticator::new(grants)),
    );
    build_app(state, &["http://localhost:3000".to_string()])
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    };
    let Ok(request) = request else {
        panic!("request should build");
    };

    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router is infallible");
    };
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body should read");
    };
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn book(app: &Router, resource_id: i64, start: &str, end: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/bookings",
        Some(USER),
        Some(json!({ "resource_id": resource_id, "start_time": start, "end_time": end })),
    )
    .await
}

#[tokio::test]
async fn health_needs_no_token() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn booking_routes_require_token() {
    let app = app();

    let (status, body) = send(&app, "GET", "/bookings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "missing token");

    let (status, body) = send(&app, "GET", "/bookings", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["message"], "invalid token");
}

#[tokio::test]
async fn overlap_adjacent_and_listing_order() {
    let app = app();

    let (status, a) = book(&app, 1, "2026-05-01T10:00:00Z", "2026-05-01T11:00:00Z").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(a["booking_id"], 1);
    assert_eq!(a["status"], "pending");
    assert_eq!(a["message"], "booking created");

    let (status, b) = book(&app, 1, "2026-05-01T10:30:00Z", "2026-05-01T11:30:00Z").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(b["error"]["code"], 2002);

    let (status, c) = book(&app, 1, "2026-05-01T11:00:00Z", "2026-05-01T12:00:00Z").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(c["booking_id"], 2);

    let (status, list) = send(&app, "GET", "/bookings", Some(USER), None).await;
    assert_eq!(status, StatusCode::OK);
    let Some(items) = list.as_array() else {
        panic!("list should be an array");
    };
    let ids: Vec<i64> = items.iter().filter_map(|b| b["id"].as_i64()).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(items.first().map(|b| b["resource_id"].clone()), Some(json!(1)));
}

#[tokio::test]
async fn invalid_ranges_are_bad_requests() {
    let app = app();

    let (status, body) = book(&app, 1, "2026-05-01T11:00:00Z", "2026-05-01T11:00:00Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "end_time must be after start_time");

    let (status, _) = book(&app, 1, "yesterday", "2026-05-01T11:00:00Z").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        "/bookings",
        Some(USER),
        Some(json!({ "resource_id": "one" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 1001);
}

#[tokio::test]
async fn approve_requires_admin_and_is_one_shot() {
    let app = app();
    let (_, created) = book(&app, 3, "2026-05-02T08:00:00Z", "2026-05-02T09:00:00Z").await;
    let id = created["booking_id"].as_i64().unwrap_or_default();
    let approve = format!("/bookings/{id}/approve");

    let (status, _) = send(&app, "POST", &approve, Some(USER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, "POST", &approve, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "approved");

    let (status, body) = send(&app, "POST", &approve, Some(ADMIN), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], 2003);

    let (status, _) = send(&app, "POST", &format!("/bookings/{id}/cancel"), Some(USER), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn cancel_frees_range_and_unknown_id_is_404() {
    let app = app();
    let (_, created) = book(&app, 4, "2026-05-03T08:00:00Z", "2026-05-03T09:00:00Z").await;
    let id = created["booking_id"].as_i64().unwrap_or_default();

    let (status, body) =
        send(&app, "POST", &format!("/bookings/{id}/cancel"), Some(USER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "cancelled");

    let (status, _) = book(&app, 4, "2026-05-03T08:00:00Z", "2026-05-03T09:00:00Z").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/bookings/999/cancel", Some(USER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], 2001);

    let (status, _) = send(&app, "GET", "/bookings/abc", Some(USER), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_booking_returns_detail() {
    let app = app();
    let (_, created) = book(&app, 5, "2026-05-04T08:00:00Z", "2026-05-04T09:00:00Z").await;
    let id = created["booking_id"].as_i64().unwrap_or_default();

    let (status, body) = send(&app, "GET", &format!("/bookings/{id}"), Some(USER), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resource_id"], 5);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["start_time"], "2026-05-04T08:00:00Z");
}

#[tokio::test]
async fn cors_preflight_allows_frontend_origin() {
    let app = app();
    let Ok(request) = Request::builder()
        .method("OPTIONS")
        .uri("/bookings")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
    else {
        panic!("request should build");
    };
    let Ok(response) = app.oneshot(request).await else {
        panic!("router is infallible");
    };
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_overlapping_requests_never_double_book() {
    let app = app();
    let mut handles = Vec::new();
    for i in 0..16 {
        let app = app.clone();
        let (start, end) = if i % 2 == 0 {
            ("2026-06-01T10:00:00Z", "2026-06-01T11:00:00Z")
        } else {
            ("2026-06-01T10:30:00Z", "2026-06-01T11:30:00Z")
        };
        handles.push(tokio::spawn(async move { book(&app, 9, start, end).await.0 }));
    }

    let mut created = 0;
    for handle in handles {
        let status = tokio_test::assert_ok!(handle.await);
        match status {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT | StatusCode::TOO_MANY_REQUESTS => {}
            other => panic!("unexpected status {other}"),
        }
    }
    assert!(created <= 1);
}
