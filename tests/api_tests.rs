use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use parking_marketplace::{
    config::{DatabaseConfig, EnvironmentConfig},
    create_app,
    state::AppState,
    utils::jwt::{generate_token, verify_token, TokenType},
};

const SECRET: &str = "test-secret-for-api-tests";

fn test_state() -> AppState {
    let config = EnvironmentConfig::from_lookup(|key| match key {
        "JWT_SECRET" => Some(SECRET.to_string()),
        _ => None,
    })
    .unwrap();
    // Ningún caso de este archivo llega a la base de datos
    let pool = DatabaseConfig::new("postgres://localhost:1/parking_test".to_string(), 1, 0)
        .create_lazy_pool()
        .unwrap();
    AppState::new(pool, config)
}

fn create_test_app() -> (Router, AppState) {
    let state = test_state();
    (create_app(state.clone()), state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = create_test_app();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "parking_marketplace");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    for uri in [
        "/api/bookings",
        "/api/bookings/active",
        "/api/parking-spots",
        "/api/private-listings",
        "/api/commercial-facilities",
        "/api/disputes",
        "/api/users/me",
    ] {
        let (app, _) = create_test_app();
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let (app, _) = create_test_app();
    let request = Request::builder()
        .uri("/api/bookings")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_bearer_token() {
    let (app, _) = create_test_app();
    let request = Request::builder()
        .uri("/api/bookings")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "JWT_ERROR");
}

#[tokio::test]
async fn test_refresh_token_rejected_as_access_token() {
    let (app, state) = create_test_app();
    let refresh = generate_token(Uuid::new_v4(), TokenType::Refresh, &state.jwt).unwrap();
    let request = Request::builder()
        .uri("/api/bookings")
        .header(header::AUTHORIZATION, format!("Bearer {}", refresh))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_refresh_issues_access_token() {
    let (app, state) = create_test_app();
    let user_id = Uuid::new_v4();
    let refresh = generate_token(user_id, TokenType::Refresh, &state.jwt).unwrap();

    let (status, body) = send(app, post_json("/api/token/refresh", json!({ "refresh": refresh }))).await;
    assert_eq!(status, StatusCode::OK);

    let access = body["access"].as_str().unwrap();
    let claims = verify_token(access, TokenType::Access, &state.jwt).unwrap();
    assert_eq!(claims.user_id().unwrap(), user_id);
}

#[tokio::test]
async fn test_token_refresh_rejects_garbage() {
    let (app, _) = create_test_app();
    let (status, _) = send(app, post_json("/api/token/refresh", json!({ "refresh": "garbage" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_refresh_rejects_access_token() {
    let (app, state) = create_test_app();
    let access = generate_token(Uuid::new_v4(), TokenType::Access, &state.jwt).unwrap();
    let (status, _) = send(app, post_json("/api/token/refresh", json!({ "refresh": access }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_missing_fields() {
    let (app, _) = create_test_app();
    let (status, body) = send(app, post_json("/api/users/login", json!({ "email": "driver@example.com" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["details"].get("password").is_some());
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let (app, _) = create_test_app();
    let request = post_json(
        "/api/users/register",
        json!({
            "email": "host@example.com",
            "name": "Asha",
            "password": "supersecret1",
            "password_confirm": "supersecret2"
        }),
    );
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _) = create_test_app();
    let request = Request::builder().uri("/api/nothing-here").body(Body::empty()).unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inventory_updates_are_routed_and_protected() {
    let id = Uuid::new_v4();
    for method in [Method::PATCH, Method::PUT] {
        for uri in [
            format!("/api/commercial-facilities/{}", id),
            format!("/api/private-listings/{}", id),
            format!("/api/parking-spots/{}", id),
        ] {
            let (app, _) = create_test_app();
            let request = Request::builder()
                .method(method.clone())
                .uri(&uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "is_24_hours": true }).to_string()))
                .unwrap();
            let (status, body) = send(app, request).await;

            // 401 y no 405: la ruta existe detrás de la autenticación
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(body["code"], "UNAUTHORIZED");
        }
    }
}
