//! Coarse gate in front of admin routes.
//!
//! The check only looks for a session flag cookie set by the login endpoint. It has no
//! server-side session behind it and must not be treated as an authorization boundary; anything
//! security sensitive needs a verifiable credential instead.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

pub const SESSION_COOKIE: &str = "admin_session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Not an admin route.
    Public,
    Allow,
    Redirect(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGuard {
    pub admin_prefix: String,
    pub login_path: String,
}

impl Default for AccessGuard {
    fn default() -> Self {
        Self {
            admin_prefix: "/admin".to_string(),
            login_path: "/login".to_string(),
        }
    }
}

impl AccessGuard {
    pub fn is_admin_path(&self, path: &str) -> bool {
        path == self.admin_prefix
            || path
                .strip_prefix(self.admin_prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn evaluate(&self, path: &str, has_session: bool) -> GuardDecision {
        if !self.is_admin_path(path) {
            GuardDecision::Public
        } else if has_session {
            GuardDecision::Allow
        } else {
            GuardDecision::Redirect(self.login_path.clone())
        }
    }
}

/// Whether the request carries `admin_session=true`.
pub fn has_session_flag(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == SESSION_COOKIE && value == "true")
}

/// `Set-Cookie` value that sets or clears the session flag.
pub fn session_cookie(signed_in: bool) -> String {
    if signed_in {
        format!("{SESSION_COOKIE}=true; Path=/; HttpOnly; SameSite=Lax")
    } else {
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

pub async fn require_admin_session(
    State(guard): State<Arc<AccessGuard>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    match guard.evaluate(&path, has_session_flag(request.headers())) {
        GuardDecision::Public | GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(location) => {
            debug!(%path, "admin route without session flag, redirecting");
            Redirect::to(&location).into_response()
        }
    }
}
