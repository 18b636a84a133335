use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use shopfront::{
    AppConfig, AppState, DisabledAuthProvider, MockAuthProvider, MockDatabase, create_router,
    auth::AuthState, database::DatabaseState, dispatch::MAX_BODY_BYTES,
};
use std::sync::Arc;
use tower::util::ServiceExt;

// --- TEST UTILITIES ---

fn test_app(db: MockDatabase, auth: AuthState, hero_image: Option<&str>) -> Router {
    let config = AppConfig {
        hero_image: hero_image.map(str::to_string),
        ..AppConfig::default()
    };
    create_router(AppState {
        db: Arc::new(db) as DatabaseState,
        auth,
        config,
    })
}

fn default_app() -> Router {
    test_app(
        MockDatabase::new(1),
        Arc::new(MockAuthProvider::new()) as AuthState,
        None,
    )
}

fn request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

// --- HEALTH & OBSERVABILITY ---

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(default_app(), request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let response = default_app()
        .oneshot(request("GET", "/health"))
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (status, body) = send_json(default_app(), request("GET", "/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/db-test").is_some());
}

// --- ROUTE CONTRACT THROUGH THE ROUTER ---

#[tokio::test]
async fn test_db_test_through_router() {
    let (status, body) = send_json(default_app(), request("GET", "/api/db-test")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "result": 1 }));
}

#[tokio::test]
async fn test_db_test_unreachable_database() {
    let app = test_app(
        MockDatabase::new_failing("pool timed out"),
        Arc::new(MockAuthProvider::new()) as AuthState,
        None,
    );

    let (status, body) = send_json(app, request("GET", "/api/db-test")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("pool timed out"));
}

#[tokio::test]
async fn test_unsupported_method_is_405() {
    for method in ["POST", "PUT", "DELETE"] {
        let (status, body) = send_json(default_app(), request(method, "/api/db-test")).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{}", method);
        assert_eq!(body, json!({ "error": "Method not allowed" }));
    }
}

#[tokio::test]
async fn test_unknown_http_method_is_405() {
    let (status, body) = send_json(default_app(), request("TRACE", "/api/auth/session")).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({ "error": "Method not allowed" }));
}

#[tokio::test]
async fn test_auth_routes_are_disabled() {
    for (method, uri) in [
        ("GET", "/api/auth/session"),
        ("POST", "/api/auth/callback/credentials"),
        ("DELETE", "/api/auth/csrf"),
    ] {
        let (status, body) = send_json(default_app(), request(method, uri)).await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED, "{} {}", method, uri);
        assert_eq!(body, json!({ "error": "Authentication is disabled" }));
    }
}

#[tokio::test]
async fn test_sign_out_through_router() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/signout")
        .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send_json(default_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn test_sign_out_with_auth_disabled() {
    let app = test_app(
        MockDatabase::new(1),
        Arc::new(DisabledAuthProvider) as AuthState,
        None,
    );

    let (status, body) = send_json(app, request("POST", "/api/signout")).await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body, json!({ "error": "Authentication is disabled" }));
}

#[tokio::test]
async fn test_message_routes_not_implemented() {
    for (method, uri) in [
        ("POST", "/api/messages/bulk"),
        ("GET", "/api/messages/labels"),
        ("POST", "/api/messages/quick-replies"),
        ("GET", "/api/messages/realtime"),
        ("GET", "/api/admin/messages"),
        ("PATCH", "/api/admin/messages/7"),
    ] {
        let (status, body) = send_json(default_app(), request(method, uri)).await;

        assert_eq!(status, StatusCode::NOT_IMPLEMENTED, "{} {}", method, uri);
        assert!(body["error"].as_str().unwrap().ends_with("is not implemented"));
    }
}

#[tokio::test]
async fn test_media_preview_through_router() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/media/preview")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"src": 42, "alt": "n/a"}"#))
        .unwrap();

    let (status, body) = send_json(default_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "rendered": false, "html": null }));
}

#[tokio::test]
async fn test_media_preview_rejects_oversized_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/media/preview")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("a".repeat(MAX_BODY_BYTES + 1)))
        .unwrap();

    let (status, body) = send_json(default_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Invalid request body: "), "got {error}");
}

#[tokio::test]
async fn test_media_preview_keeps_renderer_attributes() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/media/preview")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"src": "/a.png", "loading": "eager", "onerror": "alert(1)"}"#,
        ))
        .unwrap();

    let (status, body) = send_json(default_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "rendered": true, "html": "<img src=\"/a.png\" alt=\"\" loading=\"lazy\">" })
    );
}

// --- SERVER-RENDERED PAGES ---

#[tokio::test]
async fn test_home_page_with_hero_image() {
    let app = test_app(
        MockDatabase::new(1),
        Arc::new(MockAuthProvider::new()) as AuthState,
        Some("  /img/hero.png "),
    );

    let (status, body) = send(app, request("GET", "/")).await;
    let html = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<img src=\"/img/hero.png\""));
}

#[tokio::test]
async fn test_home_page_skips_blank_hero_image() {
    let app = test_app(
        MockDatabase::new(1),
        Arc::new(MockAuthProvider::new()) as AuthState,
        Some("   "),
    );

    let (status, body) = send(app, request("GET", "/")).await;
    let html = String::from_utf8(body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("<img"));
    assert!(html.contains("Welcome to Shopfront"));
}

#[tokio::test]
async fn test_placeholder_pages() {
    for (uri, needle) in [
        ("/products", "coming soon"),
        ("/products/42", "Product 42"),
        ("/login", "Authentication is currently disabled"),
        ("/admin/messages", "admin inbox"),
    ] {
        let (status, body) = send(default_app(), request("GET", uri)).await;
        let html = String::from_utf8(body).unwrap();

        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(html.contains(needle), "{} should mention {:?}", uri, needle);
    }
}
