use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;
use shopfront::{
    ApiError, RouteHandler, RouteMethod, RouteRequest, RouteResponse, dispatch,
    handlers::{self, AuthStub, NotImplementedRoute},
};

// --- Test Handlers ---

/// Echoes the `id` path parameter; GET only.
struct EchoId;

#[async_trait]
impl RouteHandler for EchoId {
    fn methods(&self) -> &'static [RouteMethod] {
        &[RouteMethod::Get]
    }

    async fn handle(&self, request: RouteRequest) -> Result<RouteResponse, ApiError> {
        Ok(RouteResponse::ok(&json!({ "id": request.param("id") })))
    }
}

/// Always fails the way a broken collaborator would.
struct Broken;

#[async_trait]
impl RouteHandler for Broken {
    fn methods(&self) -> &'static [RouteMethod] {
        &[RouteMethod::Post]
    }

    async fn handle(&self, _request: RouteRequest) -> Result<RouteResponse, ApiError> {
        Err(ApiError::Collaborator("connection reset by peer".to_string()))
    }
}

// --- Contract Tests ---

#[tokio::test]
async fn test_supported_method_reaches_handler() {
    let request = RouteRequest::new(RouteMethod::Get).with_param("id", "42");

    let response = dispatch(&EchoId, request).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "id": "42" }));
}

#[tokio::test]
async fn test_unsupported_methods_get_405() {
    for &method in RouteMethod::ALL {
        if method == RouteMethod::Get {
            continue;
        }
        let response = dispatch(&EchoId, RouteRequest::new(method)).await;

        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED, "{:?}", method);
        assert_eq!(response.body, json!({ "error": "Method not allowed" }));
    }
}

#[tokio::test]
async fn test_collaborator_failure_is_generic_500() {
    let response = dispatch(&Broken, RouteRequest::new(RouteMethod::Post)).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    // The underlying message is logged, not leaked.
    assert_eq!(response.body, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn test_auth_stub_answers_501_for_every_method() {
    for &method in RouteMethod::ALL {
        let request = RouteRequest::new(method)
            .with_param("action", "session")
            .with_body("not json at all");

        let response = dispatch(&AuthStub, request).await;

        assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED, "{:?}", method);
        assert_eq!(response.body, json!({ "error": "Authentication is disabled" }));
    }
}

#[tokio::test]
async fn test_not_implemented_routes() {
    let routes: [(NotImplementedRoute, RouteMethod); 6] = [
        (handlers::BULK_MESSAGES, RouteMethod::Post),
        (handlers::MESSAGE_LABELS, RouteMethod::Get),
        (handlers::QUICK_REPLIES, RouteMethod::Post),
        (handlers::REALTIME_MESSAGES, RouteMethod::Get),
        (handlers::ADMIN_MESSAGES, RouteMethod::Get),
        (handlers::ADMIN_MESSAGE, RouteMethod::Delete),
    ];

    for (route, method) in routes {
        let response = dispatch(&route, RouteRequest::new(method)).await;

        assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(
            response.body,
            json!({ "error": format!("{} is not implemented", route.feature) })
        );
    }
}

#[tokio::test]
async fn test_not_implemented_route_still_checks_method() {
    let response = dispatch(&handlers::BULK_MESSAGES, RouteRequest::new(RouteMethod::Get)).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

// --- Request/Error Unit Checks ---

#[test]
fn test_request_json_body_decoding() {
    let empty = RouteRequest::new(RouteMethod::Post).with_body("");
    assert_eq!(empty.body, None);
    assert_eq!(empty.json::<serde_json::Value>().unwrap(), None);

    let valid = RouteRequest::new(RouteMethod::Post).with_body(r#"{"src":"/a.png"}"#);
    assert_eq!(
        valid.json::<serde_json::Value>().unwrap(),
        Some(json!({ "src": "/a.png" }))
    );

    let invalid = RouteRequest::new(RouteMethod::Post).with_body("{");
    assert!(matches!(
        invalid.json::<serde_json::Value>(),
        Err(ApiError::InvalidBody(_))
    ));
}

#[test]
fn test_method_mapping() {
    use axum::http::Method;

    assert_eq!(RouteMethod::from_http(&Method::PATCH), Some(RouteMethod::Patch));
    assert_eq!(RouteMethod::from_http(&Method::TRACE), None);
    assert_eq!(RouteMethod::from_http(&Method::CONNECT), None);
}

#[test]
fn test_error_status_mapping() {
    assert_eq!(ApiError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        ApiError::NotImplemented("Labels".into()).status(),
        StatusCode::NOT_IMPLEMENTED
    );
    assert_eq!(
        ApiError::Disabled("Authentication".into()).status(),
        StatusCode::NOT_IMPLEMENTED
    );
    assert_eq!(
        ApiError::Collaborator("boom".into()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(ApiError::InvalidBody("eof".into()).status(), StatusCode::BAD_REQUEST);
}
