use axum::{Router, extract::FromRef, http::HeaderName};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Collaborators, contracts and rendering.
pub mod auth;
pub mod config;
pub mod database;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod media;
pub mod models;
pub mod pages;

// Routing split by surface (public pages, JSON API, admin).
pub mod routes;
use routes::{admin, api, public};

// --- Public Re-exports ---

pub use auth::{AuthState, DisabledAuthProvider, MockAuthProvider, SupabaseAuthProvider};
pub use config::AppConfig;
pub use database::{DatabaseState, MockDatabase, PostgresDatabase};
pub use dispatch::{RouteHandler, RouteMethod, RouteRequest, RouteResponse, dispatch};
pub use error::ApiError;

/// ApiDoc
///
/// OpenAPI document for the JSON API, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth_catch_all, handlers::sign_out, handlers::db_test,
        handlers::media_preview, handlers::bulk_messages, handlers::message_labels,
        handlers::quick_replies, handlers::realtime_messages, handlers::admin_messages,
        handlers::admin_message
    ),
    components(
        schemas(
            models::ErrorBody, models::DbTestResponse, models::SignOutResponse,
            models::MediaPreviewResponse, media::SafeImageProps, media::ImageOptions,
        )
    ),
    tags(
        (name = "shopfront", description = "Shopfront API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container for collaborators and configuration. Cloned per
/// request; everything inside is immutable or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Relational database client.
    pub db: DatabaseState,
    /// Authentication/session provider (possibly the disabled one).
    pub auth: AuthState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for DatabaseState {
    fn from_ref(app_state: &AppState) -> DatabaseState {
        app_state.db.clone()
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(app_state: &AppState) -> AuthState {
        app_state.auth.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routes, registers the state and wraps everything in the request-id,
/// tracing and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(api::api_routes())
        .merge(admin::admin_routes())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                // Generates a UUID x-request-id for every incoming request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // Echoes the request id back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span factory for `TraceLayer`: method, URI and the request id, so every log line of
/// one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
