use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use crudapps_auth::{AuthState, SessionValidator};

use crate::app::services::AuthServices;
use crate::context::CurrentUser;
use crate::cookies::{SESSION_COOKIE, cookie_value};

/// Resolve the request's session cookie to a user.
///
/// Missing, tampered or expired sessions and sessions whose user has since
/// disappeared are all `Anonymous`.
pub async fn resolve_session(services: &AuthServices, headers: &HeaderMap) -> AuthState {
    let Some(token) = cookie_value(headers, SESSION_COOKIE) else {
        return AuthState::Anonymous;
    };

    let claims = match services.sessions.validate(token, Utc::now()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("session rejected: {e}");
            return AuthState::Anonymous;
        }
    };

    match services.users.get(claims.sub).await {
        Ok(Some(user)) => AuthState::Authenticated(user),
        Ok(None) => AuthState::Anonymous,
        Err(e) => {
            tracing::error!(error = %e, "session user lookup failed");
            AuthState::Anonymous
        }
    }
}

/// Protected routes: anonymous requests are redirected to `/login`.
pub async fn require_login(
    State(services): State<Arc<AuthServices>>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match resolve_session(&services, req.headers()).await {
        AuthState::Authenticated(user) => {
            req.extensions_mut().insert(CurrentUser::new(user));
            next.run(req).await
        }
        AuthState::Anonymous => Redirect::to("/login").into_response(),
    }
}

/// One `info` line per request.
pub async fn log_requests(req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    response
}
