use crate::{AppState, handlers, pages};
use axum::{
    Router,
    routing::{any, get},
};

/// Admin Router Module
///
/// The messaging inbox admin area. Authentication is disabled, so there is no role
/// check to apply yet; the API side is mounted but answers 501.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/messages
        // Inbox admin placeholder page.
        .route("/admin/messages", get(pages::admin_messages))
        // GET /api/admin/messages
        .route("/api/admin/messages", any(handlers::admin_messages))
        // GET/PATCH/DELETE /api/admin/messages/{id}
        .route("/api/admin/messages/{id}", any(handlers::admin_message))
}
