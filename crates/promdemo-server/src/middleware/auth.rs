//! HTTP Basic authentication gate.
//!
//! Stateless per request. With no credentials configured the layer passes
//! every request through.

use std::fmt;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use promdemo_core::error::DemoError;
use subtle::ConstantTimeEq;

use crate::app_state::AppState;
use crate::error::ApiError;

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Parse `user:password` (split on the first colon). Both parts must be
    /// non-empty, otherwise auth stays disabled.
    pub fn parse(spec: &str) -> Option<Self> {
        let (username, password) = spec.split_once(':')?;
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check the `Authorization: Basic ...` header.
    pub fn matches(&self, headers: &HeaderMap) -> bool {
        let Some((user, pass)) = basic_credentials(headers) else {
            return false;
        };
        // evaluate both so timing does not reveal which one differed
        let user_ok = self.username.as_bytes().ct_eq(user.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(pass.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}

/// Decode `(user, password)` from a Basic `Authorization` header.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

pub async fn require_basic_auth(State(app): State<AppState>, req: Request, next: Next) -> Response {
    if let Some(creds) = app.auth() {
        if !creds.matches(req.headers()) {
            return ApiError(DemoError::Unauthorized).into_response();
        }
    }
    next.run(req).await
}
