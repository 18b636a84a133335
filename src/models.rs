use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Response Payloads (Output Schemas) ---

/// ErrorBody
///
/// The uniform failure body: `{ "error": "..." }`. Every non-success status produced
/// by the route contract (400, 405, 500, 501) carries this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ErrorBody {
    #[schema(example = "Method not allowed")]
    pub error: String,
}

/// DbTestResponse
///
/// Result of the database connectivity probe (GET /api/db-test).
/// `result` is set on success, `error` on failure; `ok` always reflects which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DbTestResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// SignOutResponse
///
/// Body returned once the auth provider confirmed the session was revoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SignOutResponse {
    pub ok: bool,
}

/// MediaPreviewResponse
///
/// Output of POST /api/media/preview. `html` is null whenever the guard refused the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct MediaPreviewResponse {
    pub rendered: bool,
    pub html: Option<String>,
}
