/// Router behaviour that needs no database
///
/// Every request here is answered before a query would run: by the
/// fallback, the authentication middleware or request validation.

mod common;

use axum::http::{Method, StatusCode};
use chrono::Duration;
use common::{offline_router, send, JWT_SECRET};
use serde_json::json;
use taskboard_shared::auth::jwt::JwtConfig;
use uuid::Uuid;

#[tokio::test]
async fn test_unknown_route_returns_404_envelope() {
    let (status, body) = send(&offline_router(), Method::GET, "/api/v1/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"status": "error", "message": "Route not found"}));
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = offline_router();
    let project = Uuid::new_v4();

    for (method, uri) in [
        (Method::GET, "/api/v1/projects".to_string()),
        (Method::POST, "/api/v1/projects".to_string()),
        (Method::PUT, format!("/api/v1/projects/{project}")),
        (Method::DELETE, format!("/api/v1/projects/{project}")),
        (Method::GET, format!("/api/v1/projects/{project}/tasks")),
        (Method::DELETE, format!("/api/v1/projects/{project}/tasks/{}", Uuid::new_v4())),
    ] {
        let (status, body) = send(&app, method.clone(), &uri, None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["message"], "Not authorized, no token");
    }
}

#[tokio::test]
async fn test_malformed_and_expired_tokens_are_rejected() {
    let app = offline_router();

    let (status, body) = send(&app, Method::GET, "/api/v1/projects", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    let expired = JwtConfig::new(JWT_SECRET, Duration::seconds(-30))
        .issue(Uuid::new_v4())
        .unwrap();
    let (status, body) = send(&app, Method::GET, "/api/v1/projects", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    let forged = JwtConfig::new("a-completely-different-secret-of-32-bytes", Duration::hours(1))
        .issue(Uuid::new_v4())
        .unwrap();
    let (status, _) = send(&app, Method::GET, "/api/v1/projects", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_validation_returns_field_errors() {
    let (status, body) = send(
        &offline_router(),
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({"name": "J", "email": "not-an-email", "password": "123"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Validation failed");

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "name", "password"]);
}

#[tokio::test]
async fn test_register_rejects_email_longer_than_column() {
    let label = "b".repeat(60);
    let email = format!("{}@{label}.{label}.{label}.{label}.com", "a".repeat(60));

    for uri in ["/api/v1/auth/register", "/api/v1/auth/login"] {
        let (status, body) = send(
            &offline_router(),
            Method::POST,
            uri,
            None,
            Some(json!({"name": "Jane", "email": email, "password": "secret1"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["errors"][0]["field"], "email", "{uri}");
    }
}

#[tokio::test]
async fn test_register_rejects_nul_characters() {
    let (status, body) = send(
        &offline_router(),
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({"name": "Ja\u{0}ne", "email": "jane@example.com", "password": "secret1"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_login_requires_password() {
    let (status, body) = send(
        &offline_router(),
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({"email": "test@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "password");
}

#[tokio::test]
async fn test_malformed_json_body_is_400() {
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{\"email\":"))
        .unwrap();

    let response = tower::ServiceExt::oneshot(offline_router(), request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_disconnected_database() {
    let (status, body) = send(&offline_router(), Method::GET, "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "API is running");
    assert_eq!(body["data"]["database"], "disconnected");
    assert_eq!(body["data"]["version"], taskboard_shared::VERSION);
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let request = axum::http::Request::builder()
        .uri("/api/v1/projects")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(offline_router(), request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let request = axum::http::Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/projects")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization,content-type")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(offline_router(), request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
