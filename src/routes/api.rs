use crate::{AppState, handlers};
use axum::{Router, routing::any};

/// API Router Module
///
/// Every route is mounted with `any` so the request always reaches the route
/// handler contract, which owns the 405 decision for unsupported methods.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ANY /api/auth/{*action}
        // The authentication surface. Disabled: always 501.
        .route("/api/auth/{*action}", any(handlers::auth_catch_all))
        // POST /api/signout
        // Revokes the caller's session with the auth provider.
        .route("/api/signout", any(handlers::sign_out))
        // GET /api/db-test
        // Runs a trivial query to report database reachability.
        .route("/api/db-test", any(handlers::db_test))
        // POST /api/media/preview
        // Exposes the image guard decision for a JSON payload.
        .route("/api/media/preview", any(handlers::media_preview))
        // --- Messaging (not implemented) ---
        .route("/api/messages/bulk", any(handlers::bulk_messages))
        .route("/api/messages/labels", any(handlers::message_labels))
        .route("/api/messages/quick-replies", any(handlers::quick_replies))
        .route("/api/messages/realtime", any(handlers::realtime_messages))
}
