use std::collections::HashMap;

use async_trait::async_trait;
use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::error::ApiError;

/// Largest request body the route contract will buffer (1 MiB).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// RouteMethod
///
/// The closed set of HTTP methods a route can declare. Anything outside this set
/// (TRACE, CONNECT, extension methods) is answered with 405 before a handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl RouteMethod {
    pub const ALL: &'static [RouteMethod] = &[
        RouteMethod::Get,
        RouteMethod::Head,
        RouteMethod::Post,
        RouteMethod::Put,
        RouteMethod::Patch,
        RouteMethod::Delete,
        RouteMethod::Options,
    ];

    pub fn from_http(method: &Method) -> Option<Self> {
        match method.as_str() {
            "GET" => Some(RouteMethod::Get),
            "HEAD" => Some(RouteMethod::Head),
            "POST" => Some(RouteMethod::Post),
            "PUT" => Some(RouteMethod::Put),
            "PATCH" => Some(RouteMethod::Patch),
            "DELETE" => Some(RouteMethod::Delete),
            "OPTIONS" => Some(RouteMethod::Options),
            _ => None,
        }
    }
}

/// RouteRequest
///
/// Everything a handler is allowed to see: the method, the named path parameters and
/// the raw body. The body stays undecoded until a handler asks for it, so routes that
/// ignore bodies are unaffected by malformed ones.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub method: RouteMethod,
    pub params: HashMap<String, String>,
    pub body: Option<Bytes>,
}

impl RouteRequest {
    pub fn new(method: RouteMethod) -> Self {
        Self {
            method,
            params: HashMap::new(),
            body: None,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        self.body = (!body.is_empty()).then_some(body);
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Decodes the body as JSON. An absent body is `Ok(None)`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<Option<T>, ApiError> {
        match &self.body {
            None => Ok(None),
            Some(bytes) => serde_json::from_slice(bytes)
                .map(Some)
                .map_err(|e| ApiError::InvalidBody(e.to_string())),
        }
    }
}

/// RouteResponse
///
/// The single terminal value of a handler invocation: a status and a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RouteResponse {
    pub fn new<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Self { status, body },
            Err(e) => {
                tracing::error!("Failed to serialize response body: {}", e);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: json!({ "error": "Internal server error" }),
                }
            }
        }
    }

    pub fn ok<T: Serialize>(body: &T) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn from_error(error: &ApiError) -> Self {
        Self::new(error.status(), &error.body())
    }
}

impl IntoResponse for RouteResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// RouteHandler
///
/// The uniform contract every API endpoint implements. Handlers are leaves: they never
/// call each other, and the ones doing real work hold exactly one collaborator.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    /// Methods this route answers. Everything else gets 405.
    fn methods(&self) -> &'static [RouteMethod];

    async fn handle(&self, request: RouteRequest) -> Result<RouteResponse, ApiError>;
}

/// dispatch
///
/// Runs one request through a handler and always yields a response: method check
/// first, then the handler, with any `ApiError` folded into its status and body.
pub async fn dispatch<H>(handler: &H, request: RouteRequest) -> RouteResponse
where
    H: RouteHandler + ?Sized,
{
    if !handler.methods().contains(&request.method) {
        tracing::debug!(method = ?request.method, "Method not allowed");
        return RouteResponse::from_error(&ApiError::MethodNotAllowed);
    }

    match handler.handle(request).await {
        Ok(response) => response,
        Err(error) => {
            match &error {
                ApiError::Collaborator(message) => {
                    tracing::error!("Collaborator failure: {}", message)
                }
                other => tracing::debug!("Handler declined request: {}", other),
            }
            RouteResponse::from_error(&error)
        }
    }
}

/// RouteRequest Extractor Implementation
///
/// Binds the framework request to the contract: unknown methods are rejected with 405,
/// path parameters are collected by name (none is an empty map), and the body is
/// buffered up to `MAX_BODY_BYTES`.
impl<S> FromRequest<S> for RouteRequest
where
    S: Send + Sync,
{
    type Rejection = RouteResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Some(method) = RouteMethod::from_http(req.method()) else {
            return Err(RouteResponse::from_error(&ApiError::MethodNotAllowed));
        };

        let (mut parts, body) = req.into_parts();
        let params = match Path::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
        {
            Ok(Path(params)) => params,
            Err(_) => HashMap::new(),
        };

        let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| RouteResponse::from_error(&ApiError::InvalidBody(e.to_string())))?;

        Ok(RouteRequest {
            method,
            params,
            body: (!bytes.is_empty()).then_some(bytes),
        })
    }
}
