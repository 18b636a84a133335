use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use thiserror::Error;

/// AuthError
///
/// Failures reported by an auth provider. `Disabled` is the only one that is not a
/// collaborator failure: it means authentication was turned off on purpose.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authentication is disabled")]
    Disabled,
    #[error("no session token was supplied")]
    MissingToken,
    #[error("auth provider rejected the request with status {0}")]
    Rejected(u16),
    #[error("auth provider unreachable: {0}")]
    Transport(String),
}

/// AuthProvider Contract
///
/// The external session system, reduced to the one operation this service calls.
/// `Send + Sync` so `Arc<dyn AuthProvider>` can live in the shared state.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Revokes the session identified by `token`.
    async fn sign_out(&self, token: Option<&str>) -> Result<(), AuthError>;
}

/// AuthState
///
/// The concrete type used to share the auth provider across the application state.
pub type AuthState = Arc<dyn AuthProvider>;

/// SupabaseAuthProvider
///
/// Talks to the Supabase GoTrue API over HTTP. Sign-out is
/// `POST {url}/auth/v1/logout` carrying the project key and the user's bearer token.
#[derive(Clone)]
pub struct SupabaseAuthProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseAuthProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuthProvider {
    async fn sign_out(&self, token: Option<&str>) -> Result<(), AuthError> {
        let token = token.ok_or(AuthError::MissingToken)?;
        let logout_url = format!("{}/auth/v1/logout", self.base_url);

        let response = self
            .client
            .post(logout_url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

/// DisabledAuthProvider
///
/// Installed when no provider is configured. Every operation reports `Disabled`.
#[derive(Clone, Copy, Default)]
pub struct DisabledAuthProvider;

#[async_trait]
impl AuthProvider for DisabledAuthProvider {
    async fn sign_out(&self, _token: Option<&str>) -> Result<(), AuthError> {
        Err(AuthError::Disabled)
    }
}

/// MockAuthProvider
///
/// Test double with a canned outcome.
#[derive(Clone, Debug)]
pub struct MockAuthProvider {
    /// When set, every sign-out fails with this status.
    pub reject_with: Option<u16>,
}

impl MockAuthProvider {
    pub fn new() -> Self {
        Self { reject_with: None }
    }

    pub fn new_failing() -> Self {
        Self {
            reject_with: Some(503),
        }
    }
}

impl Default for MockAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn sign_out(&self, token: Option<&str>) -> Result<(), AuthError> {
        token.ok_or(AuthError::MissingToken)?;
        match self.reject_with {
            Some(status) => Err(AuthError::Rejected(status)),
            None => Ok(()),
        }
    }
}

/// SessionToken
///
/// The bearer token of the caller, if any. Extraction never fails: whether a missing
/// token matters is the auth provider's call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToken(pub Option<String>);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim_start().split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Ok(SessionToken(token))
    }
}
