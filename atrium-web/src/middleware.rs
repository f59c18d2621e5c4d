//! Request middlewares: session resolution and the authorization gates
//!
//! Each guard adapts the axum request onto the transport-agnostic gate from
//! `atrium-auth`: it builds a request descriptor from method, path and
//! headers, locks the session handle, and turns the gate's decision into a
//! response or a pass-through.

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error};

use atrium_auth::{AccessDecision, AccessPolicy, GateRequest, SessionHandle};

/// Per-request session context stored in request extensions
#[derive(Clone)]
pub struct SessionContext {
    pub id: String,
    pub handle: SessionHandle,
}

/// Build a structured 403 response
pub fn forbidden(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

/// Extract a cookie value from a Cookie header string
fn extract_cookie(cookie_str: &str, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(&prefix) {
            return Some(value.to_string());
        }
    }
    None
}

/// Build the gate-facing request descriptor from an axum request
fn gate_request_from(request: &Request) -> GateRequest {
    let headers = request
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();

    GateRequest::new(request.method().as_str(), request.uri().path(), headers)
}

/// Session resolution middleware
///
/// Resolves the session from the cookie (creating one when absent or
/// unknown), stores a handle in request extensions, and sets the cookie on
/// newly created sessions.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.core.session.cookie_name.clone();

    let session_id = request
        .headers()
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|cookies| extract_cookie(cookies, &cookie_name));

    let (id, handle, created) = state.sessions.resolve(session_id.as_deref()).await;

    request
        .extensions_mut()
        .insert(SessionContext {
            id: id.clone(),
            handle,
        });

    let mut response = next.run(request).await;

    if created {
        if let Ok(value) =
            HeaderValue::from_str(&format!("{}={}; Path=/; HttpOnly", cookie_name, id))
        {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

/// Access decision guard, parameterized per route with an [`AccessPolicy`]
///
/// Denials are terminal 403s; a failed remote check surfaces through the
/// generic error path as a 500. No retry either way.
pub async fn access_guard(
    State((state, policy)): State<(AppState, AccessPolicy)>,
    request: Request,
    next: Next,
) -> Response {
    let Some(context) = request.extensions().get::<SessionContext>().cloned() else {
        return internal_error("Session not established");
    };

    let gate_request = gate_request_from(&request);

    let decision = {
        let mut session = context.handle.write().await;
        state
            .access_gate
            .authorize(&gate_request, &mut session, &policy)
            .await
    };

    match decision {
        Ok(AccessDecision::Allowed) => next.run(request).await,
        Ok(AccessDecision::Denied { message }) => {
            debug!(session_id = %context.id, %message, "Request denied");
            forbidden(&message)
        }
        Err(e) => {
            e.log();
            error!(session_id = %context.id, "Authorization check failed");
            internal_error("Authorization service unavailable")
        }
    }
}

/// Role elevation guard
pub async fn elevation_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(context) = request.extensions().get::<SessionContext>().cloned() else {
        return internal_error("Session not established");
    };

    let gate_request = gate_request_from(&request);

    let decision = {
        let mut session = context.handle.write().await;
        state.elevation_gate.elevate(&gate_request, &mut session)
    };

    match decision {
        AccessDecision::Allowed => next.run(request).await,
        AccessDecision::Denied { message } => {
            debug!(session_id = %context.id, %message, "Elevation denied");
            forbidden(&message)
        }
    }
}

/// Session augmentation guard: fetches the caller's permission list
pub async fn permissions_guard(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(context) = request.extensions().get::<SessionContext>().cloned() else {
        return internal_error("Session not established");
    };

    let gate_request = gate_request_from(&request);

    let decision = {
        let mut session = context.handle.write().await;
        state
            .access_gate
            .attach_permissions(&gate_request, &mut session)
            .await
    };

    match decision {
        AccessDecision::Allowed => next.run(request).await,
        AccessDecision::Denied { message } => {
            debug!(session_id = %context.id, %message, "Permission fetch denied");
            forbidden(&message)
        }
    }
}
