use crate::{AppState, pages};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Unauthenticated endpoints: the health check and the server-rendered pages.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Monitoring and load balancer check. Does not touch the database.
        .route("/health", get(|| async { "ok" }))
        // GET /
        // Landing page with the configured hero image, if usable.
        .route("/", get(pages::home))
        // GET /products, /products/{id}
        // Catalog placeholders.
        .route("/products", get(pages::products))
        .route("/products/{id}", get(pages::product_detail))
        // GET /login
        // Explains that authentication is disabled.
        .route("/login", get(pages::login))
}
