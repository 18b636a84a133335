use async_trait::async_trait;
use axum::{extract::State, http::StatusCode};

use crate::{
    auth::{AuthError, AuthState, SessionToken},
    database::DatabaseState,
    dispatch::{RouteHandler, RouteMethod, RouteRequest, RouteResponse, dispatch},
    error::ApiError,
    media::{SafeImage, SafeImageProps},
    models::{DbTestResponse, MediaPreviewResponse, SignOutResponse},
};

/// The probe statement run by the database test route.
pub const DB_PROBE_SQL: &str = "SELECT 1::int8";

// --- Route Handlers (framework independent) ---

/// AuthStub
///
/// Stands in for the whole authentication surface. Authentication is disabled, so
/// every method on every sub-path answers 501.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthStub;

#[async_trait]
impl RouteHandler for AuthStub {
    fn methods(&self) -> &'static [RouteMethod] {
        RouteMethod::ALL
    }

    async fn handle(&self, _request: RouteRequest) -> Result<RouteResponse, ApiError> {
        Err(ApiError::Disabled("Authentication".to_string()))
    }
}

/// SignOut
///
/// Revokes the caller's session through the auth provider.
pub struct SignOut {
    pub auth: AuthState,
    pub token: Option<String>,
}

#[async_trait]
impl RouteHandler for SignOut {
    fn methods(&self) -> &'static [RouteMethod] {
        &[RouteMethod::Post]
    }

    async fn handle(&self, _request: RouteRequest) -> Result<RouteResponse, ApiError> {
        match self.auth.sign_out(self.token.as_deref()).await {
            Ok(()) => Ok(RouteResponse::ok(&SignOutResponse { ok: true })),
            Err(AuthError::Disabled) => Err(ApiError::Disabled("Authentication".to_string())),
            Err(e) => Err(ApiError::Collaborator(format!("sign-out failed: {}", e))),
        }
    }
}

/// DbTest
///
/// Connectivity probe. Unlike the other handlers its failure body is not the generic
/// one: the caller gets `ok: false` and the database error text.
pub struct DbTest {
    pub db: DatabaseState,
}

#[async_trait]
impl RouteHandler for DbTest {
    fn methods(&self) -> &'static [RouteMethod] {
        &[RouteMethod::Get]
    }

    async fn handle(&self, _request: RouteRequest) -> Result<RouteResponse, ApiError> {
        match self.db.raw_query(DB_PROBE_SQL).await {
            Ok(value) => Ok(RouteResponse::ok(&DbTestResponse {
                ok: true,
                result: Some(value),
                error: None,
            })),
            Err(e) => {
                tracing::error!("Database probe failed: {}", e);
                Ok(RouteResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &DbTestResponse {
                        ok: false,
                        result: None,
                        error: Some(e.to_string()),
                    },
                ))
            }
        }
    }
}

/// NotImplementedRoute
///
/// A mounted route whose feature has not been built. Declared methods get 501,
/// the rest 405.
#[derive(Debug, Clone, Copy)]
pub struct NotImplementedRoute {
    pub feature: &'static str,
    pub methods: &'static [RouteMethod],
}

#[async_trait]
impl RouteHandler for NotImplementedRoute {
    fn methods(&self) -> &'static [RouteMethod] {
        self.methods
    }

    async fn handle(&self, _request: RouteRequest) -> Result<RouteResponse, ApiError> {
        Err(ApiError::NotImplemented(self.feature.to_string()))
    }
}

pub const BULK_MESSAGES: NotImplementedRoute = NotImplementedRoute {
    feature: "Bulk message operations",
    methods: &[RouteMethod::Post],
};

pub const MESSAGE_LABELS: NotImplementedRoute = NotImplementedRoute {
    feature: "Message labels",
    methods: &[RouteMethod::Get, RouteMethod::Post],
};

pub const QUICK_REPLIES: NotImplementedRoute = NotImplementedRoute {
    feature: "Quick replies",
    methods: &[RouteMethod::Get, RouteMethod::Post],
};

pub const REALTIME_MESSAGES: NotImplementedRoute = NotImplementedRoute {
    feature: "Realtime message polling",
    methods: &[RouteMethod::Get],
};

pub const ADMIN_MESSAGES: NotImplementedRoute = NotImplementedRoute {
    feature: "Admin message inbox",
    methods: &[RouteMethod::Get],
};

pub const ADMIN_MESSAGE: NotImplementedRoute = NotImplementedRoute {
    feature: "Admin message management",
    methods: &[RouteMethod::Get, RouteMethod::Patch, RouteMethod::Delete],
};

/// MediaPreview
///
/// Runs the image guard over a JSON body and reports what it would render.
#[derive(Debug, Clone, Default)]
pub struct MediaPreview {
    pub images: SafeImage,
}

#[async_trait]
impl RouteHandler for MediaPreview {
    fn methods(&self) -> &'static [RouteMethod] {
        &[RouteMethod::Post]
    }

    async fn handle(&self, request: RouteRequest) -> Result<RouteResponse, ApiError> {
        let props: SafeImageProps = request.json()?.unwrap_or_default();
        let html = self.images.render(&props);
        Ok(RouteResponse::ok(&MediaPreviewResponse {
            rendered: html.is_some(),
            html,
        }))
    }
}

// --- Axum Bindings ---

/// auth_catch_all
///
/// [Public Route] Every authentication endpoint. Authentication is disabled.
#[utoipa::path(
    method(get, post),
    path = "/api/auth/{action}",
    params(("action" = String, Path, description = "Any auth sub-path")),
    responses((status = 501, description = "Authentication is disabled", body = crate::models::ErrorBody))
)]
pub async fn auth_catch_all(request: RouteRequest) -> RouteResponse {
    dispatch(&AuthStub, request).await
}

/// sign_out
///
/// [Public Route] Signs the bearer of the `Authorization` token out with the provider.
#[utoipa::path(
    post,
    path = "/api/signout",
    responses(
        (status = 200, description = "Signed out", body = SignOutResponse),
        (status = 405, description = "Method not allowed", body = crate::models::ErrorBody),
        (status = 500, description = "Auth provider failure", body = crate::models::ErrorBody),
        (status = 501, description = "Authentication is disabled", body = crate::models::ErrorBody)
    )
)]
pub async fn sign_out(
    State(auth): State<AuthState>,
    SessionToken(token): SessionToken,
    request: RouteRequest,
) -> RouteResponse {
    dispatch(&SignOut { auth, token }, request).await
}

/// db_test
///
/// [Public Route] Database connectivity probe.
#[utoipa::path(
    get,
    path = "/api/db-test",
    responses(
        (status = 200, description = "Database reachable", body = DbTestResponse),
        (status = 500, description = "Database error", body = DbTestResponse)
    )
)]
pub async fn db_test(State(db): State<DatabaseState>, request: RouteRequest) -> RouteResponse {
    dispatch(&DbTest { db }, request).await
}

/// media_preview
///
/// [Public Route] Shows whether an image source would be rendered, and how.
#[utoipa::path(
    post,
    path = "/api/media/preview",
    request_body = SafeImageProps,
    responses(
        (status = 200, description = "Guard decision", body = MediaPreviewResponse),
        (status = 400, description = "Malformed body", body = crate::models::ErrorBody)
    )
)]
pub async fn media_preview(request: RouteRequest) -> RouteResponse {
    dispatch(&MediaPreview::default(), request).await
}

#[utoipa::path(post, path = "/api/messages/bulk",
    responses((status = 501, description = "Not implemented", body = crate::models::ErrorBody)))]
pub async fn bulk_messages(request: RouteRequest) -> RouteResponse {
    dispatch(&BULK_MESSAGES, request).await
}

#[utoipa::path(get, path = "/api/messages/labels",
    responses((status = 501, description = "Not implemented", body = crate::models::ErrorBody)))]
pub async fn message_labels(request: RouteRequest) -> RouteResponse {
    dispatch(&MESSAGE_LABELS, request).await
}

#[utoipa::path(get, path = "/api/messages/quick-replies",
    responses((status = 501, description = "Not implemented", body = crate::models::ErrorBody)))]
pub async fn quick_replies(request: RouteRequest) -> RouteResponse {
    dispatch(&QUICK_REPLIES, request).await
}

#[utoipa::path(get, path = "/api/messages/realtime",
    responses((status = 501, description = "Not implemented", body = crate::models::ErrorBody)))]
pub async fn realtime_messages(request: RouteRequest) -> RouteResponse {
    dispatch(&REALTIME_MESSAGES, request).await
}

/// admin_messages
///
/// [Admin Route] Inbox listing for administrators. Not built yet.
#[utoipa::path(get, path = "/api/admin/messages",
    responses((status = 501, description = "Not implemented", body = crate::models::ErrorBody)))]
pub async fn admin_messages(request: RouteRequest) -> RouteResponse {
    dispatch(&ADMIN_MESSAGES, request).await
}

#[utoipa::path(get, path = "/api/admin/messages/{id}",
    params(("id" = String, Path, description = "Message ID")),
    responses((status = 501, description = "Not implemented", body = crate::models::ErrorBody)))]
pub async fn admin_message(request: RouteRequest) -> RouteResponse {
    dispatch(&ADMIN_MESSAGE, request).await
}
