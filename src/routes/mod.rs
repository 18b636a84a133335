/// Router Module Index
///
/// Splits routing by surface: server-rendered pages and health, the JSON API, and the
/// admin area.

/// Health check and server-rendered pages.
pub mod public;

/// JSON API routes, each bound to the route handler contract.
pub mod api;

/// Admin inbox page and API.
pub mod admin;
