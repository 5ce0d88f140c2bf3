//! HTTP basic authentication for write-protected routes.
//!
//! A single shared credential guards article creation, editing and deletion.
//! Handlers opt in by taking a [`Writer`] argument.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

use crate::server::AppState;

/// The configured write credential.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
    realm: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str, realm: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            realm: realm.to_string(),
        }
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Compare both halves without short-circuiting on the first mismatch.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = constant_time_eq(self.username.as_bytes(), username.as_bytes());
        let pass_ok = constant_time_eq(self.password.as_bytes(), password.as_bytes());
        user_ok & pass_ok
    }

    /// Check the `Authorization` header of a request.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AuthError> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Err(self.fail(AuthFailure::Missing));
        };

        let (username, password) = value
            .to_str()
            .ok()
            .and_then(parse_basic)
            .ok_or_else(|| self.fail(AuthFailure::Malformed))?;

        if !self.verify(&username, &password) {
            return Err(self.fail(AuthFailure::Rejected));
        }
        Ok(())
    }

    fn fail(&self, failure: AuthFailure) -> AuthError {
        AuthError {
            failure,
            realm: self.realm.clone(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("realm", &self.realm)
            .finish()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Decode a `Basic <base64(user:pass)>` header value.
pub fn parse_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    Missing,
    Malformed,
    Rejected,
}

/// Rejection for write-protected routes; always answered with a 401 challenge.
#[derive(Debug)]
pub struct AuthError {
    pub failure: AuthFailure,
    pub realm: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.failure {
            AuthFailure::Missing => write!(f, "missing credentials"),
            AuthFailure::Malformed => write!(f, "malformed authorization header"),
            AuthFailure::Rejected => write!(f, "invalid credentials"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let challenge = format!("Basic realm=\"{}\"", self.realm.replace('"', "'"));
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, challenge)],
            Html("<h3>Unauthorized</h3>"),
        )
            .into_response()
    }
}

/// Extractor for requests carrying the write credential.
#[derive(Debug, Clone, Copy)]
pub struct Writer;

impl FromRequestParts<AppState> for Writer {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.credentials.authorize(&parts.headers) {
            Ok(()) => Ok(Writer),
            Err(e) => {
                debug!(path = %parts.uri.path(), "auth failed: {}", e);
                Err(e)
            }
        }
    }
}
