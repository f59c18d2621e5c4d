//! User handlers

use super::types::{CurrentUserResponse, UserResponse};
use crate::{middleware::SessionContext, AppState, WebResult};
use atrium_auth::X_EMAIL;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
    Extension,
};

/// The caller's own session view
///
/// The permission fetch gate has already populated the session's permission
/// list by the time this runs; the CRM contact is looked up by the same
/// email the fetch used.
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    summary = "Current user",
    description = "Return the caller's session identity, fetched permissions and CRM contact",
    responses(
        (status = 200, description = "Current session view", body = CurrentUserResponse),
        (status = 403, description = "No permissions available")
    )
)]
pub async fn current_user(
    State(state): State<AppState>,
    Extension(context): Extension<SessionContext>,
    headers: HeaderMap,
) -> WebResult<Json<CurrentUserResponse>> {
    let contact = match headers.get(X_EMAIL).and_then(|value| value.to_str().ok()) {
        Some(email) => state.crm.find_user_by_email(email).await?,
        None => None,
    };

    let session = context.handle.read().await;
    let mut response = CurrentUserResponse::from(&*session);
    response.contact = contact.map(UserResponse::from);

    Ok(Json(response))
}

/// Get a CRM user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    summary = "Get user",
    params(("id" = String, Path, description = "Contact id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 403, description = "Access denied"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> WebResult<Json<UserResponse>> {
    let user = state.crm.get_user(&id).await?;
    Ok(Json(user.into()))
}
